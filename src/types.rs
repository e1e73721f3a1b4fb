//! Value types shared by the mapper, the rasterizer and the packager.
//!
//! Everything here is an immutable snapshot: the host builds a fresh
//! [`GridConfig`], [`PanOffset`] and [`ViewportMetrics`] for every export call
//! and nothing in the pipeline mutates them.

use serde::{Deserialize, Serialize};

/// Largest row or column count the grid accepts.
pub const MAX_GRID_DIMENSION: u32 = 20;

/// Grid dimensions for one export.
///
/// Both values always lie in `1..=MAX_GRID_DIMENSION`: [`GridConfig::new`]
/// clamps, and deserialization goes through the same clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawGrid", into = "RawGrid")]
pub struct GridConfig {
    rows: u32,
    cols: u32,
}

/// Unchecked wire form of [`GridConfig`].
#[derive(Serialize, Deserialize)]
struct RawGrid {
    rows: u32,
    cols: u32,
}

impl From<RawGrid> for GridConfig {
    fn from(raw: RawGrid) -> Self {
        GridConfig::new(raw.rows, raw.cols)
    }
}

impl From<GridConfig> for RawGrid {
    fn from(grid: GridConfig) -> Self {
        RawGrid {
            rows: grid.rows,
            cols: grid.cols,
        }
    }
}

impl GridConfig {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows: rows.clamp(1, MAX_GRID_DIMENSION),
            cols: cols.clamp(1, MAX_GRID_DIMENSION),
        }
    }

    pub fn rows(self) -> u32 {
        self.rows
    }

    pub fn cols(self) -> u32 {
        self.cols
    }

    /// Number of tiles the grid produces (`rows * cols`).
    pub fn tile_count(self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// All tiles in row-major order: every column of row 0, then row 1, …
    pub fn tiles(self) -> impl Iterator<Item = Tile> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Tile::new(row, col, cols)))
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        GridPreset::Default4x6.grid()
    }
}

impl From<GridPreset> for GridConfig {
    fn from(preset: GridPreset) -> Self {
        preset.grid()
    }
}

/// One-click grid layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum GridPreset {
    /// Four columns, six rows: the common messenger sticker-pack layout.
    #[serde(rename = "4x6")]
    #[value(name = "4x6")]
    Default4x6,
    #[serde(rename = "3x3")]
    #[value(name = "3x3")]
    Square3x3,
}

impl GridPreset {
    pub fn grid(self) -> GridConfig {
        match self {
            GridPreset::Default4x6 => GridConfig { rows: 6, cols: 4 },
            GridPreset::Square3x3 => GridConfig { rows: 3, cols: 3 },
        }
    }
}

/// How far the preview image was dragged from its centered default, in
/// display pixels. Positive values mean right/down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PanOffset {
    pub x: f64,
    pub y: f64,
}

impl PanOffset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Native size of the decoded sheet and the size it was displayed at when the
/// export was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportMetrics {
    pub natural_width: f64,
    pub natural_height: f64,
    pub display_width: f64,
    pub display_height: f64,
}

impl ViewportMetrics {
    /// Metrics for an image shown at its native size (scale 1:1).
    pub fn unscaled(natural_width: u32, natural_height: u32) -> Self {
        Self {
            natural_width: natural_width as f64,
            natural_height: natural_height as f64,
            display_width: natural_width as f64,
            display_height: natural_height as f64,
        }
    }

    pub fn scale_x(&self) -> f64 {
        self.natural_width / self.display_width
    }

    pub fn scale_y(&self) -> f64 {
        self.natural_height / self.display_height
    }

    /// All four sizes are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        [
            self.natural_width,
            self.natural_height,
            self.display_width,
            self.display_height,
        ]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0)
    }
}

/// Position of one grid cell. `index` is 1-based and row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub row: u32,
    pub col: u32,
    pub index: usize,
}

impl Tile {
    pub fn new(row: u32, col: u32, cols: u32) -> Self {
        Self {
            row,
            col,
            index: row as usize * cols as usize + col as usize + 1,
        }
    }
}
