//! Raster backend trait and shared handle types.
//!
//! The [`RasterBackend`] trait defines the three operations every backend must
//! support: decode, draw, and encode. The pipeline in [`crate::export`] only
//! talks to this trait, so it can run against the recording mock in tests.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::calculations::SliceRect;
use image::RgbaImage;
use thiserror::Error;

/// Largest drawing surface we are willing to allocate, in pixels.
pub const MAX_SURFACE_PIXELS: u64 = 16_384 * 16_384;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to acquire drawing surface: {0}")]
    Surface(String),
    #[error("Failed to encode tile: {0}")]
    Encode(String),
}

/// A decoded sheet, always held as 8-bit RGBA.
///
/// Dropping the raster releases its pixel buffer; there is no separate
/// release step.
#[derive(Debug, Clone)]
pub struct Raster {
    pixels: RgbaImage,
}

impl Raster {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn natural_width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn natural_height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// The single drawing surface reused for every tile of an export.
///
/// Owned exclusively by one export call. Tiles are drawn one after another
/// into the same buffer, which is why tile rendering is strictly sequential.
#[derive(Debug)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    pub fn new() -> Self {
        Self {
            pixels: RgbaImage::new(0, 0),
        }
    }

    /// Resize to `width × height` and clear to transparent.
    ///
    /// Keeps the existing allocation when the size is unchanged.
    pub fn prepare(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        if width == 0 || height == 0 {
            return Err(BackendError::Surface(format!(
                "surface must be non-empty, got {width}x{height}"
            )));
        }
        if width as u64 * height as u64 > MAX_SURFACE_PIXELS {
            return Err(BackendError::Surface(format!(
                "{width}x{height} exceeds the {MAX_SURFACE_PIXELS} pixel limit"
            )));
        }
        if self.pixels.dimensions() == (width, height) {
            self.pixels.fill(0);
        } else {
            self.pixels = RgbaImage::new(width, height);
        }
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }
}

/// Trait for raster backends.
///
/// `draw` renders `rect` of the source into the surface at the origin, 1:1,
/// after the caller has sized and cleared the surface with
/// [`Surface::prepare`].
pub trait RasterBackend {
    /// Decode raw image bytes.
    fn decode(&self, bytes: &[u8]) -> Result<Raster, BackendError>;

    /// Draw the source region described by `rect` onto the surface.
    fn draw(
        &self,
        raster: &Raster,
        rect: &SliceRect,
        surface: &mut Surface,
    ) -> Result<(), BackendError>;

    /// Encode the surface into the output format.
    fn encode(&self, surface: &Surface) -> Result<Vec<u8>, BackendError>;
}
