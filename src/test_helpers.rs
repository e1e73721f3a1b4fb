//! Shared test utilities: synthetic sheets and archive inspection.
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let sheet = gradient_sheet(90, 60);
//! let bytes = png_bytes(&sheet);
//! // ... export ...
//! let entries = zip_entries(&archive.bytes);
//! assert_eq!(entry_names(&entries)[0], "stickers/sticker_01.png");
//! ```

use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use std::io::{Cursor, Read};

// =========================================================================
// Synthetic sheets
// =========================================================================

/// An RGBA sheet where every pixel is distinct (for sheets up to 256×256)
/// and alpha varies, so misplaced or dropped pixels show up in comparisons.
pub fn gradient_sheet(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 200 + (x % 2) as u8 * 55])
    })
}

/// Encode an RGBA image as PNG bytes.
pub fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)
        .unwrap();
    buf
}

/// A small valid JPEG with the given dimensions.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

// =========================================================================
// Archive inspection
// =========================================================================

/// Read every entry of a zip archive in stored order as `(name, contents)`.
pub fn zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut contents = Vec::new();
            file.read_to_end(&mut contents).unwrap();
            (file.name().to_string(), contents)
        })
        .collect()
}

pub fn entry_names(entries: &[(String, Vec<u8>)]) -> Vec<&str> {
    entries.iter().map(|(name, _)| name.as_str()).collect()
}
