//! Raster work for slicing: geometry, decode, draw, encode.
//!
//! | Operation | Where |
//! |---|---|
//! | **Map** grid + pan → source rectangles | [`map_slices`] (pure) |
//! | **Decode** sheet bytes | [`RasterBackend::decode`] |
//! | **Draw** one rectangle onto the reused surface | [`RasterBackend::draw`] |
//! | **Encode** surface → PNG | [`RasterBackend::encode`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for slice geometry (unit testable)
//! - **Backend**: [`RasterBackend`] trait + [`Raster`]/[`Surface`] handles
//! - **Rust backend**: [`RustBackend`] on the `image` crate

pub mod backend;
pub mod calculations;
pub mod rust_backend;

pub use backend::{BackendError, Raster, RasterBackend, Surface};
pub use calculations::{SliceRect, map_slices, surface_dimensions};
pub use rust_backend::RustBackend;
