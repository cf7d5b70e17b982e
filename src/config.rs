//! Tool configuration module.
//!
//! Handles loading, validating, and merging `postkit.toml`. Stock defaults are
//! overridden by an optional config file in the working directory (or one
//! passed with `--config`), and command-line flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [cover]
//! width = 1000               # Canvas width in pixels
//! height = 420               # Canvas height in pixels
//! background = [0, 0, 0]     # Letterbox colour as [R, G, B]
//!
//! [publish]
//! articles_dir = "articles"  # Directory scanned by `postkit publish`
//! extension = "md"           # Only files with this extension are articles
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [cover]
//! background = [255, 255, 255]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Background, DEFAULT_COVER_HEIGHT, DEFAULT_COVER_WIDTH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "postkit.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// Tool configuration loaded from `postkit.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Cover image canvas settings.
    pub cover: CoverSettings,
    /// Publish scheduler settings.
    pub publish: PublishSettings,
}

impl ToolConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cover.width == 0 || self.cover.height == 0 {
            return Err(ConfigError::Validation(
                "cover.width and cover.height must be non-zero".into(),
            ));
        }
        if self.publish.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Validation(
                "publish.extension must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Cover image canvas settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoverSettings {
    pub width: u32,
    pub height: u32,
    /// Fill colour for the bands around the scaled image.
    pub background: Background,
}

impl Default for CoverSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_COVER_WIDTH,
            height: DEFAULT_COVER_HEIGHT,
            background: Background::black(),
        }
    }
}

/// Publish scheduler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishSettings {
    /// Directory whose top-level articles are scanned (not recursive).
    pub articles_dir: PathBuf,
    /// Article file extension, without the dot.
    pub extension: String,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            articles_dir: PathBuf::from("articles"),
            extension: "md".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ToolConfig::default()).expect("default config must serialize")
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ToolConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ToolConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `postkit.toml` in the given directory.
///
/// Uses stock defaults when the file is absent.
pub fn load_config(dir: &Path) -> Result<ToolConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(&dir.join(CONFIG_FILE))?)
}

/// Load config from an explicit file path. A missing file is an error.
pub fn load_config_file(path: &Path) -> Result<ToolConfig, ConfigError> {
    let overlay =
        load_raw_config(path)?.ok_or_else(|| ConfigError::NotFound(path.to_path_buf()))?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Returns a fully-commented stock `postkit.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# postkit configuration
# =====================
# Place this file as postkit.toml in the directory you run postkit from,
# or pass it with --config. All options are optional; the values below are
# the defaults. Command-line flags override anything set here.

# ---------------------------------------------------------------------------
# Cover images (postkit cover)
# ---------------------------------------------------------------------------
[cover]
# Canvas size in pixels. dev.to recommends 1000x420.
width = 1000
height = 420

# Colour of the letterbox/pillarbox bands as [R, G, B], each 0-255.
background = [0, 0, 0]

# ---------------------------------------------------------------------------
# Scheduled publishing (postkit publish)
# ---------------------------------------------------------------------------
[publish]
# Directory holding the articles. Only files directly inside it are scanned.
articles_dir = "articles"

# Extension of article files, without the dot. Matched case-insensitively.
extension = "md"
"##
}
