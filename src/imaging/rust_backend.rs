//! Pure Rust raster backend on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Sniff format | `image::guess_format` (magic bytes, not file extension) |
//! | Decode (PNG, JPEG, WebP) | `image::load_from_memory_with_format` → RGBA8 |
//! | Draw | nearest-pixel copy, transparent outside the source |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (lossless, keeps alpha) |

use super::backend::{BackendError, RasterBackend, Raster, Surface};
use super::calculations::{SliceRect, source_pixel};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat};

/// Sheet formats accepted as input.
const SUPPORTED_FORMATS: &[ImageFormat] = &[ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP];

/// Returns the input formats that have a working decoder compiled in.
pub fn supported_input_formats() -> Vec<ImageFormat> {
    SUPPORTED_FORMATS
        .iter()
        .copied()
        .filter(|fmt| fmt.reading_enabled())
        .collect()
}

/// Backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<Raster, BackendError> {
        let format = image::guess_format(bytes)
            .map_err(|e| BackendError::Decode(format!("unrecognized image data: {e}")))?;
        if !supported_input_formats().contains(&format) {
            return Err(BackendError::Decode(format!(
                "unsupported format: {format:?}"
            )));
        }
        let img = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| BackendError::Decode(format!("{format:?}: {e}")))?;
        Ok(Raster::new(img.to_rgba8()))
    }

    fn draw(
        &self,
        raster: &Raster,
        rect: &SliceRect,
        surface: &mut Surface,
    ) -> Result<(), BackendError> {
        let source = raster.pixels();
        let (src_w, src_h) = (source.width() as i64, source.height() as i64);
        let (dst_w, dst_h) = (surface.width(), surface.height());
        let target = surface.pixels_mut();

        for dy in 0..dst_h {
            let sy = source_pixel(rect.sy, dy);
            if !(0..src_h).contains(&sy) {
                continue;
            }
            for dx in 0..dst_w {
                let sx = source_pixel(rect.sx, dx);
                if !(0..src_w).contains(&sx) {
                    continue;
                }
                target.put_pixel(dx, dy, *source.get_pixel(sx as u32, sy as u32));
            }
        }
        Ok(())
    }

    fn encode(&self, surface: &Surface) -> Result<Vec<u8>, BackendError> {
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf)
            .write_image(
                surface.pixels().as_raw(),
                surface.width(),
                surface.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| BackendError::Encode(format!("PNG encode failed: {e}")))?;
        Ok(buf)
    }
}
