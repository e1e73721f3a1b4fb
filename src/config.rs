//! Slicer configuration.
//!
//! Handles loading, validating, and merging `slicer.toml`. Stock defaults are
//! overridden by the user file, and CLI flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! language = "en"           # "en" or "zh"
//!
//! [grid]
//! rows = 6                  # 1-20
//! cols = 4                  # 1-20
//!
//! [output]
//! folder = "stickers"       # Folder inside the archive
//! file_prefix = "sticker"   # sticker_01.png, sticker_02.png, ...
//! index_padding = "minimum" # "minimum" (2 digits) or "uniform"
//!
//! [archive]
//! compression = "deflated"  # "deflated" or "stored"
//! # level = 6               # Deflate level 0-9 (omit for default)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [grid]
//! rows = 3
//! cols = 3
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::archive::{ArchiveOptions, Compression};
use crate::i18n::Language;
use crate::naming::IndexPadding;
use crate::types::{GridConfig, MAX_GRID_DIMENSION};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the config directory.
pub const CONFIG_FILENAME: &str = "slicer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `slicer.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlicerConfig {
    /// Language of CLI messages.
    pub language: Language,
    /// Default grid when no size is given on the command line.
    pub grid: GridSection,
    /// Names inside the archive.
    pub output: OutputSection,
    /// Zip compression settings.
    pub archive: ArchiveSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridSection {
    pub rows: u32,
    pub cols: u32,
}

impl Default for GridSection {
    fn default() -> Self {
        let grid = GridConfig::default();
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    /// Folder holding the tiles inside the archive.
    pub folder: String,
    /// Tile filename prefix.
    pub file_prefix: String,
    /// How tile indices are zero-padded.
    pub index_padding: IndexPadding,
}

impl Default for OutputSection {
    fn default() -> Self {
        let options = ArchiveOptions::default();
        Self {
            folder: options.folder,
            file_prefix: options.file_prefix,
            index_padding: options.padding,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveSection {
    pub compression: Compression,
    /// Deflate level 0-9. Absent means the zip crate's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
}

impl SlicerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = 1..=MAX_GRID_DIMENSION;
        if !dims.contains(&self.grid.rows) || !dims.contains(&self.grid.cols) {
            return Err(ConfigError::Validation(format!(
                "grid.rows and grid.cols must be 1-{MAX_GRID_DIMENSION}"
            )));
        }
        if self.output.file_prefix.is_empty() || self.output.file_prefix.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "output.file_prefix must be a non-empty name without slashes".into(),
            ));
        }
        if self.output.folder.is_empty() {
            return Err(ConfigError::Validation(
                "output.folder must not be empty".into(),
            ));
        }
        match (self.archive.compression, self.archive.level) {
            (_, None) => {}
            (Compression::Stored, Some(_)) => {
                return Err(ConfigError::Validation(
                    "archive.level only applies to deflated compression".into(),
                ));
            }
            (Compression::Deflated, Some(level)) if !(0..=9).contains(&level) => {
                return Err(ConfigError::Validation(
                    "archive.level must be 0-9".into(),
                ));
            }
            (Compression::Deflated, Some(_)) => {}
        }
        Ok(())
    }

    pub fn grid(&self) -> GridConfig {
        GridConfig::new(self.grid.rows, self.grid.cols)
    }

    pub fn archive_options(&self) -> ArchiveOptions {
        ArchiveOptions {
            folder: self.output.folder.clone(),
            file_prefix: self.output.file_prefix.clone(),
            padding: self.output.index_padding,
            compression: self.archive.compression,
            level: self.archive.level,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SlicerConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `slicer.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SlicerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SlicerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `slicer.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<SlicerConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `slicer.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Sticker Slicer Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override them.
# Unknown keys will cause an error.

# Language of progress and status messages: "en" or "zh".
language = "en"

# ---------------------------------------------------------------------------
# Grid
# ---------------------------------------------------------------------------
[grid]
# Rows and columns to cut the sheet into, each 1-20.
# 6 rows x 4 columns is the common messenger sticker-pack layout.
rows = 6
cols = 4

# ---------------------------------------------------------------------------
# Archive contents
# ---------------------------------------------------------------------------
[output]
# Folder holding the tiles inside the zip.
folder = "stickers"

# Tiles are named <file_prefix>_<index>.png, numbered row by row from 1.
file_prefix = "sticker"

# "minimum": pad indices to two digits (sticker_01 ... sticker_400).
# "uniform": pad every index to the width of the largest (sticker_001 ...).
index_padding = "minimum"

# ---------------------------------------------------------------------------
# Compression
# ---------------------------------------------------------------------------
[archive]
# "deflated" or "stored" (no compression; PNG data barely shrinks anyway).
compression = "deflated"

# Deflate level 0-9. Omit to use the default.
# level = 6
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SlicerConfig::default();
        assert_eq!(config.language, Language::En);
        assert_eq!(config.grid(), GridConfig::new(6, 4));
        assert_eq!(config.output.folder, "stickers");
        assert_eq!(config.output.file_prefix, "sticker");
        assert_eq!(config.output.index_padding, IndexPadding::Minimum);
        assert_eq!(config.archive.compression, Compression::Deflated);
        assert_eq!(config.archive.level, None);
        assert_eq!(config.archive_options(), ArchiveOptions::default());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[grid]
rows = 3
cols = 3
"#;
        let config: SlicerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.grid(), GridConfig::new(3, 3));
        // Defaults preserved
        assert_eq!(config.output.folder, "stickers");
        assert_eq!(config.language, Language::En);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
language = "zh"

[grid]
rows = 2
cols = 5

[output]
folder = "emoji"
file_prefix = "face"
index_padding = "uniform"

[archive]
compression = "deflated"
level = 9
"#;
        let config: SlicerConfig = toml::from_str(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.language, Language::Zh);
        let options = config.archive_options();
        assert_eq!(options.folder, "emoji");
        assert_eq!(options.file_prefix, "face");
        assert_eq!(options.padding, IndexPadding::Uniform);
        assert_eq!(options.level, Some(9));
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<SlicerConfig, _> = toml::from_str("[grid]\nrowz = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_grid() {
        let mut config = SlicerConfig::default();
        config.grid.rows = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.grid.rows = 21;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_level_with_stored() {
        let mut config = SlicerConfig::default();
        config.archive.compression = Compression::Stored;
        config.archive.level = Some(3);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_level_out_of_range() {
        let mut config = SlicerConfig::default();
        config.archive.level = Some(12);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_prefix_with_slash() {
        let mut config = SlicerConfig::default();
        config.output.file_prefix = "a/b".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("language = \"en\"").unwrap();
        let overlay: toml::Value = toml::from_str("language = \"zh\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["language"].as_str(), Some("zh"));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[grid]\nrows = 6\ncols = 4\n").unwrap();
        let overlay: toml::Value = toml::from_str("[grid]\ncols = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["grid"]["rows"].as_integer(), Some(6));
        assert_eq!(merged["grid"]["cols"].as_integer(), Some(3));
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value().unwrap();
        let table = value.as_table().unwrap();
        for key in ["language", "grid", "output", "archive"] {
            assert!(table.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn merge_preserves_untouched_keys() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[output]\nfolder = \"x\"\n").unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(config.output.folder, "x");
        assert_eq!(config.output.file_prefix, "sticker");
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, SlicerConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "language = \"zh\"\n[grid]\ncols = 8\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.language, Language::Zh);
        assert_eq!(config.grid.cols, 8);
        assert_eq!(config.grid.rows, 6);
    }

    #[test]
    fn load_config_invalid_toml_errors() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[grid\nrows = ").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_invalid_values_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[grid]\nrows = 40\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: SlicerConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, SlicerConfig::default());
    }
}
