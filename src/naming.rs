//! Filenames inside and of the exported archive.
//!
//! ## Tile names
//!
//! Tiles are named `{prefix}_{index}.png` with a 1-based, row-major index:
//! - `sticker_01.png` … `sticker_24.png` for a 4×6 grid
//! - `sticker_01.png` … `sticker_400.png` for 20×20 with [`IndexPadding::Minimum`]
//! - `sticker_001.png` … `sticker_400.png` for 20×20 with [`IndexPadding::Uniform`]
//!
//! ## Archive name
//!
//! The input filename loses exactly its last extension and gains `_sliced.zip`:
//! `sheet.PNG` → `sheet_sliced.zip`, `pack.v2.webp` → `pack.v2_sliced.zip`.

use serde::{Deserialize, Serialize};

/// Extension written for every tile.
pub const TILE_EXTENSION: &str = "png";

/// Suffix appended to the input stem to name the archive.
pub const ARCHIVE_SUFFIX: &str = "_sliced.zip";

/// Smallest number of digits an index is padded to.
const MIN_INDEX_WIDTH: usize = 2;

/// How tile indices are zero-padded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexPadding {
    /// Pad to two digits; larger indices keep their natural width.
    #[default]
    Minimum,
    /// Pad every index to the digit count of the largest one, so names sort
    /// lexically in tile order for any grid size.
    Uniform,
}

impl IndexPadding {
    /// Digit width used for a grid of `total` tiles.
    pub fn width(self, total: usize) -> usize {
        match self {
            IndexPadding::Minimum => MIN_INDEX_WIDTH,
            IndexPadding::Uniform => digit_count(total).max(MIN_INDEX_WIDTH),
        }
    }
}

fn digit_count(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

/// Filename for tile `index` (1-based) out of `total`.
pub fn tile_filename(prefix: &str, index: usize, total: usize, padding: IndexPadding) -> String {
    let width = padding.width(total);
    format!("{prefix}_{index:0>width$}.{TILE_EXTENSION}")
}

/// Strip the last extension of `filename`.
///
/// The extension is everything after the last dot, and must be non-empty: a
/// trailing dot is left alone. A name that is only an extension (`.png`)
/// strips to the empty string.
pub fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(pos) if pos + 1 < filename.len() && !filename[pos + 1..].contains('/') => {
            &filename[..pos]
        }
        _ => filename,
    }
}

/// Archive name for an input file: `{stem}_sliced.zip`.
///
/// Only the final path component of `input_filename` is used.
pub fn archive_filename(input_filename: &str) -> String {
    let base = input_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(input_filename);
    format!("{}{ARCHIVE_SUFFIX}", strip_extension(base))
}
