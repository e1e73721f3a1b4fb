//! Packaging encoded tiles into a zip archive.
//!
//! ## Layout
//!
//! ```text
//! sheet_sliced.zip
//! └── stickers/
//!     ├── sticker_01.png     # row 0, col 0
//!     ├── sticker_02.png     # row 0, col 1
//!     └── ...                # row-major, 1-based
//! ```
//!
//! The folder entry is written before any tile. If it cannot be created the
//! packager stops there and no archive is returned.
//!
//! ## Progress
//!
//! Compressor progress is the share of encoded tile bytes already written,
//! reported after each tile except the last. The terminal 100 is left to the
//! caller, who only sends it once [`package`] has returned the finished
//! archive. Byte counts only grow, so the signal never moves backwards.
//!
//! Entries carry the zip default timestamp (1980-01-01), so the same tiles
//! always produce byte-identical archives.

use crate::naming::{IndexPadding, archive_filename, tile_filename};
use crate::progress::ProgressAggregator;
use crate::types::Tile;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Invalid archive folder name: {0:?}")]
    InvalidFolder(String),
}

/// Compression applied to tile entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

impl Compression {
    fn method(self) -> CompressionMethod {
        match self {
            Compression::Deflated => CompressionMethod::Deflated,
            Compression::Stored => CompressionMethod::Stored,
        }
    }
}

/// How tiles are named and compressed inside the archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveOptions {
    pub folder: String,
    pub file_prefix: String,
    pub padding: IndexPadding,
    pub compression: Compression,
    /// Deflate level; `None` uses the zip crate's default.
    pub level: Option<i64>,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            folder: "stickers".to_string(),
            file_prefix: "sticker".to_string(),
            padding: IndexPadding::default(),
            compression: Compression::default(),
            level: None,
        }
    }
}

/// One rasterized tile, ready to be archived.
#[derive(Debug, Clone)]
pub struct EncodedTile {
    pub tile: Tile,
    pub bytes: Vec<u8>,
}

/// A finished archive, held in memory until delivered.
#[derive(Debug, Clone)]
pub struct ExportArchive {
    /// Archive filename, e.g. `sheet_sliced.zip`.
    pub name: String,
    /// Tile entry paths in archive order, e.g. `stickers/sticker_01.png`.
    pub entries: Vec<String>,
    /// The zip file itself.
    pub bytes: Vec<u8>,
}

/// Check that `folder` is a usable relative path inside the archive.
pub fn validate_folder(folder: &str) -> Result<(), ArchiveError> {
    let bad = folder.is_empty()
        || folder.starts_with('/')
        || folder.contains('\\')
        || folder.split('/').any(|part| part.is_empty() || part == "." || part == "..");
    if bad {
        return Err(ArchiveError::InvalidFolder(folder.to_string()));
    }
    Ok(())
}

/// Build the archive for `tiles`, which must already be in row-major order.
///
/// `input_filename` is the original sheet name; it only decides the archive
/// name.
pub fn package(
    tiles: &[EncodedTile],
    input_filename: &str,
    options: &ArchiveOptions,
    progress: &ProgressAggregator,
) -> Result<ExportArchive, ArchiveError> {
    validate_folder(&options.folder)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let file_options = SimpleFileOptions::default()
        .compression_method(options.compression.method())
        .compression_level(options.level);
    zip.add_directory(format!("{}/", options.folder), SimpleFileOptions::default())?;

    let total = tiles.len();
    let total_bytes: usize = tiles.iter().map(|t| t.bytes.len()).sum();
    let mut written_bytes = 0usize;
    let mut entries = Vec::with_capacity(total);

    for (position, encoded) in tiles.iter().enumerate() {
        let filename = tile_filename(
            &options.file_prefix,
            encoded.tile.index,
            total,
            options.padding,
        );
        let path = format!("{}/{}", options.folder, filename);
        log::debug!("archiving {} ({} bytes)", path, encoded.bytes.len());

        zip.start_file(path.as_str(), file_options)?;
        zip.write_all(&encoded.bytes)?;
        entries.push(path);

        written_bytes += encoded.bytes.len();
        if position + 1 < total {
            progress.compressor(compressor_percent(written_bytes, total_bytes));
        }
    }

    let bytes = zip.finish()?.into_inner();
    let name = archive_filename(input_filename);
    log::info!("built {} with {} tiles ({} bytes)", name, total, bytes.len());

    Ok(ExportArchive {
        name,
        entries,
        bytes,
    })
}

fn compressor_percent(written: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    written as f64 / total as f64 * 100.0
}

/// Write the archive into `dir` under its own name and return the path.
pub fn deliver(archive: &ExportArchive, dir: &Path) -> Result<PathBuf, ArchiveError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&archive.name);
    std::fs::write(&path, &archive.bytes)?;
    log::info!("delivered {}", path.display());
    Ok(path)
}
