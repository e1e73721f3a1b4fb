//! # Sticker Slicer
//!
//! Cuts a single sticker-sheet image into a grid of equally sized PNG tiles
//! and packs them into one zip archive. Everything happens locally: the sheet
//! is read from memory, the tiles are drawn in memory, and the archive is
//! handed back as bytes for the host to save.
//!
//! # Architecture: One Synchronous Pipeline
//!
//! An export is a single call that runs four steps in strict order, each
//! finishing before the next starts:
//!
//! ```text
//! 1. Decode    bytes     →  Raster             (PNG, JPEG, WebP)
//! 2. Map       grid+pan  →  [SliceRect]        (pure geometry, row-major)
//! 3. Render    rects     →  [EncodedTile]      (one reused surface, PNG)
//! 4. Package   tiles     →  ExportArchive      (<name>_sliced.zip)
//! ```
//!
//! Progress for steps 3 and 4 is folded into one 0–100 signal: rendering fills
//! the first half, packaging the second, and exactly one `Done` event at 100
//! closes a successful export. A failed export emits nothing after the error.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Grid, pan, viewport and tile value types; grid presets |
//! | [`imaging`] | Slice geometry ([`imaging::map_slices`]) and the decode/draw/encode backend |
//! | [`naming`] | Tile and archive filenames |
//! | [`progress`] | Two-phase progress aggregation over an `mpsc` channel |
//! | [`archive`] | Zip packaging and delivery to disk |
//! | [`export`] | The pipeline entry point, [`export::export`] |
//! | [`i18n`] | English and Chinese message tables for the CLI |
//! | [`config`] | `slicer.toml` loading, validation and stock defaults |
//! | [`output`] | CLI output formatting for plans, progress and results |
//!
//! # Design Decisions
//!
//! ## The Preview Is Not the Source
//!
//! The host shows a scaled, pannable preview with a grid overlay. Tiles are
//! never cut from that preview: pan offsets are converted from display pixels
//! into native pixels, and every tile is drawn from the full-resolution sheet.
//! Panned-away regions come out transparent rather than clamped, so what the
//! user framed is what they get.
//!
//! ## Backend Trait
//!
//! Decoding, drawing and encoding go through [`imaging::RasterBackend`]. The
//! production backend is pure Rust on the `image` crate; tests swap in a mock
//! that records every call, so ordering and error propagation are checked
//! without touching real pixels.
//!
//! ## Sequential Rendering
//!
//! Tiles are rendered one at a time on a single surface that is reused while
//! the tile size stays the same. Peak memory is the source plus one tile plus
//! the encoded tiles, regardless of grid size.
//!
//! ## Deterministic Archives
//!
//! Entry order is fixed (folder, then tiles in row-major order) and entries
//! carry the zip default timestamp, so the same sheet and settings always
//! produce byte-identical archives.

pub mod archive;
pub mod config;
pub mod export;
pub mod i18n;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod progress;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
