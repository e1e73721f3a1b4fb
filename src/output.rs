//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Plan
//!
//! ```text
//! Preview showing 4 columns x 6 rows
//! 01 r0 c0  (0, 0) 300x133 → stickers/sticker_01.png
//! 02 r0 c1  (300, 0) 300x133 → stickers/sticker_02.png
//! ...
//! ```
//!
//! ## Slice
//!
//! ```text
//! Processing... 4%
//! ...
//! Packing archive... 98%
//! Done 100%
//! sheet_sliced.zip (24 tiles, 183204 bytes)
//!     Saved to: out/sheet_sliced.zip
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>` or `String`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::archive::{ArchiveOptions, ExportArchive};
use crate::i18n::Messages;
use crate::imaging::{SliceRect, surface_dimensions};
use crate::naming::tile_filename;
use crate::progress::{ExportStatus, ProgressEvent};
use crate::types::{GridConfig, Tile};
use serde::Serialize;
use std::path::Path;

// ============================================================================
// Plan
// ============================================================================

/// One tile of a slicing plan, as printed by `plan --json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanEntry {
    pub index: usize,
    pub row: u32,
    pub col: u32,
    /// Path of the tile inside the archive.
    pub entry: String,
    pub rect: SliceRect,
    pub width: u32,
    pub height: u32,
}

/// Pair every tile with its rectangle and archive entry.
pub fn plan_entries(
    grid: GridConfig,
    rects: &[SliceRect],
    options: &ArchiveOptions,
) -> Vec<PlanEntry> {
    let total = grid.tile_count();
    grid.tiles()
        .zip(rects)
        .map(|(tile, rect)| plan_entry(tile, rect, total, options))
        .collect()
}

fn plan_entry(tile: Tile, rect: &SliceRect, total: usize, options: &ArchiveOptions) -> PlanEntry {
    let (width, height) = surface_dimensions(rect);
    PlanEntry {
        index: tile.index,
        row: tile.row,
        col: tile.col,
        entry: format!(
            "{}/{}",
            options.folder,
            tile_filename(&options.file_prefix, tile.index, total, options.padding)
        ),
        rect: *rect,
        width,
        height,
    }
}

/// Format a slicing plan as a header plus one line per tile.
pub fn format_plan(
    grid: GridConfig,
    rects: &[SliceRect],
    options: &ArchiveOptions,
    messages: &Messages,
) -> Vec<String> {
    let mut lines = vec![messages.preview_info(grid.cols(), grid.rows())];
    for entry in plan_entries(grid, rects, options) {
        lines.push(format!(
            "{:02} r{} c{}  ({}, {}) {}x{} \u{2192} {}",
            entry.index,
            entry.row,
            entry.col,
            format_coord(entry.rect.sx),
            format_coord(entry.rect.sy),
            entry.width,
            entry.height,
            entry.entry
        ));
    }
    lines
}

pub fn print_plan(
    grid: GridConfig,
    rects: &[SliceRect],
    options: &ArchiveOptions,
    messages: &Messages,
) {
    for line in format_plan(grid, rects, options, messages) {
        println!("{}", line);
    }
}

/// Render the plan as pretty-printed JSON.
pub fn format_plan_json(
    grid: GridConfig,
    rects: &[SliceRect],
    options: &ArchiveOptions,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&plan_entries(grid, rects, options))
}

/// Whole numbers print bare, fractions keep two decimals.
fn format_coord(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value)
    } else {
        format!("{:.2}", value)
    }
}

// ============================================================================
// Slice
// ============================================================================

/// Format a progress event as a single status line, e.g. `Processing... 42%`.
pub fn format_progress_event(event: &ProgressEvent, messages: &Messages) -> String {
    let label = match event.status {
        ExportStatus::Processing => messages.processing,
        ExportStatus::Zipping => messages.zipping,
        ExportStatus::Done => messages.done,
    };
    format!("{} {}%", label, event.percent.round() as u32)
}

/// Format the result of a finished export.
pub fn format_export_summary(
    archive: &ExportArchive,
    saved_to: &Path,
    messages: &Messages,
) -> Vec<String> {
    vec![
        format!(
            "{} ({} tiles, {} bytes)",
            archive.name,
            archive.entries.len(),
            archive.bytes.len()
        ),
        format!("    {}: {}", messages.saved_to, saved_to.display()),
    ]
}

pub fn print_export_summary(archive: &ExportArchive, saved_to: &Path, messages: &Messages) {
    for line in format_export_summary(archive, saved_to, messages) {
        println!("{}", line);
    }
}

/// Format a failed export: the localized notice, then the technical cause.
pub fn format_failure(err: &dyn std::error::Error, messages: &Messages) -> Vec<String> {
    vec![messages.error.to_string(), format!("    {}", err)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::imaging::map_slices;
    use crate::naming::IndexPadding;
    use crate::types::ViewportMetrics;
    use std::path::PathBuf;

    fn en() -> &'static Messages {
        Language::En.messages()
    }

    // =========================================================================
    // Plan
    // =========================================================================

    #[test]
    fn plan_lists_every_tile_in_order() {
        let grid = GridConfig::new(6, 4);
        let rects = map_slices(grid, &ViewportMetrics::unscaled(1200, 800), None);
        let lines = format_plan(grid, &rects, &ArchiveOptions::default(), en());

        assert_eq!(lines.len(), 25);
        assert_eq!(lines[0], "Preview showing 4 columns x 6 rows");
        assert_eq!(
            lines[1],
            "01 r0 c0  (0, 0) 300x133 \u{2192} stickers/sticker_01.png"
        );
        assert!(lines[13].starts_with("13 r3 c0  (0, 400"));
        assert!(lines[13].contains(") 300x133 "));
        assert!(lines[24].ends_with("stickers/sticker_24.png"));
    }

    #[test]
    fn plan_entries_follow_archive_naming() {
        let grid = GridConfig::new(1, 3);
        let rects = map_slices(grid, &ViewportMetrics::unscaled(300, 100), None);
        let options = ArchiveOptions {
            folder: "pack".to_string(),
            file_prefix: "emoji".to_string(),
            padding: IndexPadding::Uniform,
            ..ArchiveOptions::default()
        };
        let entries = plan_entries(grid, &rects, &options);
        let names: Vec<&str> = entries.iter().map(|e| e.entry.as_str()).collect();
        assert_eq!(names, vec!["pack/emoji_01.png", "pack/emoji_02.png", "pack/emoji_03.png"]);
        assert_eq!((entries[2].width, entries[2].height), (100, 100));
    }

    #[test]
    fn plan_json_is_an_array_of_entries() {
        let grid = GridConfig::new(1, 2);
        let rects = map_slices(grid, &ViewportMetrics::unscaled(200, 50), None);
        let json = format_plan_json(grid, &rects, &ArchiveOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["index"], 2);
        assert_eq!(items[1]["rect"]["sx"], 100.0);
        assert_eq!(items[1]["entry"], "stickers/sticker_02.png");
    }

    #[test]
    fn format_coord_whole_and_fractional() {
        assert_eq!(format_coord(300.0), "300");
        assert_eq!(format_coord(133.333_333), "133.33");
        assert_eq!(format_coord(-100.0), "-100");
    }

    // =========================================================================
    // Slice
    // =========================================================================

    #[test]
    fn progress_lines_use_phase_labels() {
        let event = ProgressEvent {
            percent: 41.6,
            status: ExportStatus::Processing,
        };
        assert_eq!(format_progress_event(&event, en()), "Processing... 42%");

        let event = ProgressEvent {
            percent: 75.0,
            status: ExportStatus::Zipping,
        };
        assert_eq!(format_progress_event(&event, en()), "Packing archive... 75%");

        let event = ProgressEvent {
            percent: 100.0,
            status: ExportStatus::Done,
        };
        assert_eq!(
            format_progress_event(&event, Language::Zh.messages()),
            "完成 100%"
        );
    }

    #[test]
    fn export_summary_shows_name_and_path() {
        let archive = ExportArchive {
            name: "sheet_sliced.zip".to_string(),
            entries: vec!["stickers/sticker_01.png".to_string()],
            bytes: vec![0; 42],
        };
        let path = PathBuf::from("out/sheet_sliced.zip");
        let lines = format_export_summary(&archive, &path, en());
        assert_eq!(lines[0], "sheet_sliced.zip (1 tiles, 42 bytes)");
        assert_eq!(lines[1], "    Saved to: out/sheet_sliced.zip");
    }

    #[test]
    fn failure_leads_with_localized_notice() {
        let err = std::io::Error::other("boom");
        let lines = format_failure(&err, en());
        assert_eq!(lines[0], en().error);
        assert_eq!(lines[1], "    boom");
    }

    #[test]
    fn failure_report_names_the_cause_once() {
        let err = crate::export::ExportError::Decode("not a PNG".to_string());
        let lines = format_failure(&err, Language::Zh.messages());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], Language::Zh.messages().error);
        assert_eq!(lines.iter().filter(|l| l.contains("not a PNG")).count(), 1);
    }
}
