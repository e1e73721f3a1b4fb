//! Pure slice geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::types::{GridConfig, PanOffset, ViewportMetrics};
use serde::Serialize;

/// Source region for one output tile, in native source pixels.
///
/// Coordinates may be fractional and may lie partly or wholly outside the
/// source image once a pan offset is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliceRect {
    pub sx: f64,
    pub sy: f64,
    pub s_width: f64,
    pub s_height: f64,
}

/// Map a grid and a viewport snapshot onto source-space rectangles.
///
/// Returns one rectangle per cell, row-major. The slice size is the native
/// size divided by the grid; a pan offset shifts every rectangle by
/// `(-pan.x * scale_x, -pan.y * scale_y)`, so dragging the preview right or
/// down reveals content further left or up. Nothing is clamped to the image
/// bounds.
///
/// # Examples
/// ```
/// # use sticker_slicer::imaging::map_slices;
/// # use sticker_slicer::types::{GridConfig, ViewportMetrics};
/// let rects = map_slices(GridConfig::new(3, 3), &ViewportMetrics::unscaled(900, 900), None);
/// assert_eq!(rects.len(), 9);
/// assert_eq!((rects[4].sx, rects[4].sy), (300.0, 300.0));
/// ```
pub fn map_slices(
    grid: GridConfig,
    metrics: &ViewportMetrics,
    pan: Option<PanOffset>,
) -> Vec<SliceRect> {
    let slice_width = metrics.natural_width / grid.cols() as f64;
    let slice_height = metrics.natural_height / grid.rows() as f64;
    let (x_offset, y_offset) = source_offset(metrics, pan);

    grid.tiles()
        .map(|tile| SliceRect {
            sx: tile.col as f64 * slice_width + x_offset,
            sy: tile.row as f64 * slice_height + y_offset,
            s_width: slice_width,
            s_height: slice_height,
        })
        .collect()
}

/// Translate a display-space pan into a source-space offset.
pub fn source_offset(metrics: &ViewportMetrics, pan: Option<PanOffset>) -> (f64, f64) {
    match pan {
        Some(pan) => (-pan.x * metrics.scale_x(), -pan.y * metrics.scale_y()),
        None => (0.0, 0.0),
    }
}

/// Pixel size of the drawing surface for a rectangle.
///
/// Fractional sizes are truncated, never below one pixel.
pub fn surface_dimensions(rect: &SliceRect) -> (u32, u32) {
    (truncate_extent(rect.s_width), truncate_extent(rect.s_height))
}

fn truncate_extent(extent: f64) -> u32 {
    if extent.is_finite() && extent >= 1.0 {
        extent.min(u32::MAX as f64) as u32
    } else {
        1
    }
}

/// Source pixel sampled for destination column/row `dest` of a tile whose
/// rectangle starts at `origin`: the pixel containing the destination
/// pixel's center. May be negative or past the image edge.
pub fn source_pixel(origin: f64, dest: u32) -> i64 {
    (origin + dest as f64 + 0.5).floor() as i64
}
