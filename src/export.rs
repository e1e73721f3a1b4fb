//! The slice-and-package pipeline.
//!
//! ```text
//! bytes ──decode──▶ Raster ──map_slices──▶ [SliceRect; rows*cols]
//!                                              │
//!                   one reused Surface ◀──draw─┘  (sequential, row-major)
//!                          │
//!                       encode ──▶ [EncodedTile] ──package──▶ ExportArchive
//! ```
//!
//! Each step finishes before the next starts: all rectangles are computed from
//! one viewport snapshot, every tile is drawn and encoded before the following
//! one, and packaging only starts when all tiles exist. Any failure ends the
//! export; there is no partial archive and no progress event after the error.
//!
//! The drawing surface and the archive writer belong to the call. Two exports
//! running at once share nothing, so hosts may run them on separate threads.

use crate::archive::{self, ArchiveError, ArchiveOptions, EncodedTile, ExportArchive};
use crate::imaging::{
    BackendError, Raster, RasterBackend, RustBackend, SliceRect, Surface, map_slices,
    surface_dimensions,
};
use crate::progress::{ProgressAggregator, ProgressEvent};
use crate::types::{GridConfig, PanOffset, ViewportMetrics};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to acquire drawing surface: {0}")]
    Surface(String),
    #[error("Failed to encode tile: {0}")]
    Encode(String),
    #[error("Failed to build archive: {0}")]
    Archive(#[from] ArchiveError),
    #[error("Invalid viewport metrics: {0:?}")]
    InvalidViewport(ViewportMetrics),
    #[error("Invalid pan offset: {0:?}")]
    InvalidPan(PanOffset),
}

impl From<BackendError> for ExportError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Decode(msg) => ExportError::Decode(msg),
            BackendError::Surface(msg) => ExportError::Surface(msg),
            BackendError::Encode(msg) => ExportError::Encode(msg),
        }
    }
}

/// Everything the host supplies for one export.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    /// Original filename of the sheet; names the archive.
    pub filename: &'a str,
    pub grid: GridConfig,
    /// Absent means no pan.
    pub pan: Option<PanOffset>,
    /// Absent means the sheet was shown at its native size. A pan is only
    /// applied together with a viewport.
    pub viewport: Option<ViewportMetrics>,
}

impl<'a> ExportRequest<'a> {
    pub fn new(filename: &'a str, grid: GridConfig) -> Self {
        Self {
            filename,
            grid,
            pan: None,
            viewport: None,
        }
    }

    pub fn with_pan(mut self, pan: PanOffset, viewport: ViewportMetrics) -> Self {
        self.pan = Some(pan);
        self.viewport = Some(viewport);
        self
    }
}

/// Slice `bytes` and package the tiles with the `image`-crate backend.
pub fn export(
    bytes: &[u8],
    request: &ExportRequest<'_>,
    options: &ArchiveOptions,
    progress: Option<Sender<ProgressEvent>>,
) -> Result<ExportArchive, ExportError> {
    export_with_backend(&RustBackend::new(), bytes, request, options, progress)
}

/// Run the pipeline against a specific backend (allows testing with mock).
pub fn export_with_backend(
    backend: &impl RasterBackend,
    bytes: &[u8],
    request: &ExportRequest<'_>,
    options: &ArchiveOptions,
    progress: Option<Sender<ProgressEvent>>,
) -> Result<ExportArchive, ExportError> {
    if let Some(viewport) = request.viewport {
        if !viewport.is_valid() {
            return Err(ExportError::InvalidViewport(viewport));
        }
    }
    if let Some(pan) = request.pan {
        if !pan.is_finite() {
            return Err(ExportError::InvalidPan(pan));
        }
    }
    archive::validate_folder(&options.folder)?;

    let raster = backend.decode(bytes)?;
    log::debug!(
        "decoded {}: {}x{}",
        request.filename,
        raster.natural_width(),
        raster.natural_height()
    );

    let metrics = resolve_metrics(&raster, request.viewport);
    let rects = map_slices(request.grid, &metrics, effective_pan(request));
    let aggregator = ProgressAggregator::new(rects.len(), progress);

    let tiles = rasterize(backend, &raster, request.grid, &rects, &aggregator)?;
    drop(raster);

    let archive = archive::package(&tiles, request.filename, options, &aggregator)?;
    aggregator.finished();
    Ok(archive)
}

/// The pan to apply. Without viewport metrics there is no scale to convert
/// display pixels with, so the pan is dropped.
fn effective_pan(request: &ExportRequest<'_>) -> Option<PanOffset> {
    match (request.pan, request.viewport) {
        (Some(pan), None) => {
            log::warn!(
                "ignoring pan ({}, {}) for {}: no viewport metrics",
                pan.x,
                pan.y,
                request.filename
            );
            None
        }
        (pan, _) => pan,
    }
}

/// Viewport metrics for the decoded raster.
///
/// The decoded size always wins over what the host reported as natural size;
/// the host's display size is kept, so the scale follows the real image.
fn resolve_metrics(raster: &Raster, viewport: Option<ViewportMetrics>) -> ViewportMetrics {
    let natural = ViewportMetrics::unscaled(raster.natural_width(), raster.natural_height());
    match viewport {
        None => natural,
        Some(v) => {
            if v.natural_width != natural.natural_width || v.natural_height != natural.natural_height
            {
                log::warn!(
                    "viewport reports {}x{} but the image is {}x{}; using the decoded size",
                    v.natural_width,
                    v.natural_height,
                    natural.natural_width,
                    natural.natural_height
                );
            }
            ViewportMetrics {
                display_width: v.display_width,
                display_height: v.display_height,
                ..natural
            }
        }
    }
}

/// Draw and encode every rectangle, in order, on one reused surface.
///
/// `rects` must come from [`map_slices`] for the same `grid`.
pub fn rasterize(
    backend: &impl RasterBackend,
    raster: &Raster,
    grid: GridConfig,
    rects: &[SliceRect],
    progress: &ProgressAggregator,
) -> Result<Vec<EncodedTile>, ExportError> {
    let mut surface = Surface::new();
    let mut tiles = Vec::with_capacity(rects.len());

    for (tile, rect) in grid.tiles().zip(rects) {
        let (width, height) = surface_dimensions(rect);
        surface.prepare(width, height)?;
        backend.draw(raster, rect, &mut surface)?;
        let bytes = backend.encode(&surface)?;
        log::debug!(
            "tile {} (row {}, col {}): {}x{} from ({:.2}, {:.2}), {} bytes",
            tile.index,
            tile.row,
            tile.col,
            width,
            height,
            rect.sx,
            rect.sy,
            bytes.len()
        );

        tiles.push(EncodedTile { tile, bytes });
        progress.tile_done(tiles.len());
    }

    Ok(tiles)
}
