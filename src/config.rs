//! Card configuration module.
//!
//! Handles loading, validating, and merging `card.toml`. Configuration is
//! layered: stock defaults, then the config file, then command-line
//! overrides. Each layer only needs the keys it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [storage]
//! upload_dir = "uploads/images"          # Where PNGs are written
//! base_url = "http://localhost:8080"     # Public origin
//! public_path = "/uploads/images"        # URL path the upload dir is served under
//!
//! [fonts]
//! title = "fonts/GenShinGothic-Bold.ttf"
//! body = "fonts/GenShinGothic-Regular.ttf"
//!
//! [colors]
//! background = "#ffffff"
//! text = "#000000"
//! chip = "#c8c8c8"
//!
//! [mirror]
//! # dir = "/mnt/backup/thumbnails"      # Copy each thumbnail here in the background
//!
//! [processing]
//! max_processes = 4                      # Max parallel renders (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::Palette;
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Card configuration loaded from `card.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardConfig {
    /// Output directory and public URL settings.
    pub storage: StorageConfig,
    /// Font files for the title and body faces.
    pub fonts: FontsConfig,
    /// Fill colors.
    pub colors: ColorsConfig,
    /// Optional background copy of every thumbnail.
    pub mirror: MirrorConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl CardConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "storage.base_url must not be empty".into(),
            ));
        }
        if !self.storage.public_path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "storage.public_path must start with '/', got {:?}",
                self.storage.public_path
            )));
        }
        if self.storage.upload_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "storage.upload_dir must not be empty".into(),
            ));
        }
        if self.fonts.title.as_os_str().is_empty() || self.fonts.body.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "fonts.title and fonts.body must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        self.colors.palette()?;
        Ok(())
    }
}

/// Where thumbnails go and how they are addressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub base_url: String,
    pub public_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads/images"),
            base_url: "http://localhost:8080".to_string(),
            public_path: "/uploads/images".to_string(),
        }
    }
}

impl StorageConfig {
    /// Public URL for a stored file.
    ///
    /// A trailing slash on `base_url` or `public_path` is tolerated.
    pub fn image_url(&self, file_name: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url.trim_end_matches('/'),
            self.public_path.trim_end_matches('/'),
            file_name
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    /// Bold face used for the title.
    pub title: PathBuf,
    /// Regular face used for everything else.
    pub body: PathBuf,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            title: PathBuf::from("fonts/GenShinGothic-Bold.ttf"),
            body: PathBuf::from("fonts/GenShinGothic-Regular.ttf"),
        }
    }
}

/// Hex colors (`#rgb` or `#rrggbb`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorsConfig {
    pub background: String,
    pub text: String,
    pub chip: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#000000".to_string(),
            chip: "#c8c8c8".to_string(),
        }
    }
}

impl ColorsConfig {
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        let parse = |key: &str, value: &str| {
            parse_hex_color(value).ok_or_else(|| {
                ConfigError::Validation(format!(
                    "colors.{key} must be #rgb or #rrggbb, got {value:?}"
                ))
            })
        };
        Ok(Palette {
            background: parse("background", &self.background)?,
            text: parse("text", &self.text)?,
            chip: parse("chip", &self.chip)?,
        })
    }
}

/// Parse `#rgb` / `#rrggbb` into an opaque color.
pub fn parse_hex_color(value: &str) -> Option<Rgba<u8>> {
    let hex = value.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                rgb[i] = v * 17;
            }
            Some(Rgba([rgb[0], rgb[1], rgb[2], 255]))
        }
        6 => Some(Rgba([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        ])),
        _ => None,
    }
}

/// Background mirroring of rendered files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MirrorConfig {
    /// Directory to copy each thumbnail into. Disabled when absent.
    pub dir: Option<PathBuf>,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Stock defaults as a `toml::Value::Table`, the base layer for merging.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CardConfig::default()).expect("default config must serialize")
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

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays onto `base` in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<CardConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: CardConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `path` over stock defaults, then apply `overrides` last.
pub fn load_config(
    path: &Path,
    overrides: impl IntoIterator<Item = toml::Value>,
) -> Result<CardConfig, ConfigError> {
    let file = load_raw_config(path)?;
    resolve_config(stock_defaults_value(), file.into_iter().chain(overrides))
}

/// A single-key overlay: `{ section = { key = value } }`.
pub fn override_value(section: &str, key: &str, value: impl Into<toml::Value>) -> toml::Value {
    let mut inner = toml::map::Map::new();
    inner.insert(key.to_string(), value.into());
    let mut outer = toml::map::Map::new();
    outer.insert(section.to_string(), toml::Value::Table(inner));
    toml::Value::Table(outer)
}

/// Returns a fully-commented stock `card.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Card Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags (--upload-dir, --base-url) override this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Storage
# ---------------------------------------------------------------------------
[storage]
# Directory rendered PNGs are written to. Created on first render.
upload_dir = "uploads/images"

# Public origin. A trailing slash is ignored.
base_url = "http://localhost:8080"

# URL path under which upload_dir is served. Must start with '/'.
# image_url = base_url + public_path + "/" + <uuid>_thumb.png
public_path = "/uploads/images"

# ---------------------------------------------------------------------------
# Fonts
# ---------------------------------------------------------------------------
# TrueType/OpenType files. Both need CJK coverage for Japanese titles.
[fonts]
title = "fonts/GenShinGothic-Bold.ttf"
body = "fonts/GenShinGothic-Regular.ttf"

# ---------------------------------------------------------------------------
# Colors (#rgb or #rrggbb)
# ---------------------------------------------------------------------------
[colors]
background = "#ffffff"
text = "#000000"
# Tag chip background.
chip = "#c8c8c8"

# ---------------------------------------------------------------------------
# Mirror
# ---------------------------------------------------------------------------
# Copy every thumbnail to a second directory on a background thread.
# Failures are logged and never affect the render result.
[mirror]
# dir = "/mnt/backup/thumbnails"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel renders for `batch`. Omit for auto (= number of CPU cores).
# Values above the core count are clamped down.
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = CardConfig::default();
        assert_eq!(config.storage.upload_dir, Path::new("uploads/images"));
        assert_eq!(config.storage.base_url, "http://localhost:8080");
        assert_eq!(config.colors.chip, "#c8c8c8");
        assert!(config.mirror.dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_palette_matches_painter_default() {
        let palette = CardConfig::default().colors.palette().unwrap();
        assert_eq!(palette, Palette::default());
    }

    #[test]
    fn image_url_joins_parts() {
        let storage = StorageConfig::default();
        assert_eq!(
            storage.image_url("abc_thumb.png"),
            "http://localhost:8080/uploads/images/abc_thumb.png"
        );
    }

    #[test]
    fn image_url_tolerates_trailing_slashes() {
        let storage = StorageConfig {
            base_url: "https://blog.example.com/".into(),
            public_path: "/media/".into(),
            ..StorageConfig::default()
        };
        assert_eq!(
            storage.image_url("x.png"),
            "https://blog.example.com/media/x.png"
        );
    }

    #[test]
    fn parse_hex_colors() {
        assert_eq!(parse_hex_color("#ffffff"), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(parse_hex_color("#c8c8c8"), Some(Rgba([200, 200, 200, 255])));
        assert_eq!(parse_hex_color("#f0a"), Some(Rgba([255, 0, 170, 255])));
        assert_eq!(parse_hex_color("ffffff"), None);
        assert_eq!(parse_hex_color("#ffff"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
        assert_eq!(parse_hex_color("#ÿÿÿ"), None);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[colors]
chip = "#eeeeee"
"##;
        let config: CardConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.colors.chip, "#eeeeee");
        assert_eq!(config.colors.background, "#ffffff");
        assert_eq!(config.storage.public_path, "/uploads/images");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml = r#"
[storage]
upload_directory = "x"
"#;
        let result: Result<CardConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_rejects_bad_color() {
        let mut config = CardConfig::default();
        config.colors.text = "black".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("colors.text"), "{err}");
    }

    #[test]
    fn validate_rejects_relative_public_path() {
        let mut config = CardConfig::default();
        config.storage.public_path = "uploads".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_empty_base_url() {
        let mut config = CardConfig::default();
        config.storage.base_url = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_processes() {
        let mut config = CardConfig::default();
        config.processing.max_processes = Some(0);
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // Loading and merging
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("card.toml"), []).unwrap();
        assert_eq!(config.storage.base_url, "http://localhost:8080");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("card.toml");
        fs::write(
            &path,
            r#"
[storage]
base_url = "https://example.com"

[processing]
max_processes = 2
"#,
        )
        .unwrap();

        let config = load_config(&path, []).unwrap();
        assert_eq!(config.storage.base_url, "https://example.com");
        assert_eq!(config.storage.upload_dir, Path::new("uploads/images"));
        assert_eq!(config.processing.max_processes, Some(2));
    }

    #[test]
    fn overrides_win_over_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("card.toml");
        fs::write(&path, "[storage]\nupload_dir = \"from-file\"\n").unwrap();

        let config = load_config(
            &path,
            [override_value("storage", "upload_dir", "from-cli")],
        )
        .unwrap();
        assert_eq!(config.storage.upload_dir, Path::new("from-cli"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("card.toml");
        fs::write(&path, "this is not toml [[[").unwrap();
        assert!(matches!(load_config(&path, []), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("card.toml");
        fs::write(&path, "[colors]\nbackground = \"#12\"\n").unwrap();
        assert!(matches!(
            load_config(&path, []),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn merge_preserves_untouched_keys() {
        let base = stock_defaults_value();
        let merged = merge_toml(base, override_value("colors", "chip", "#000"));
        let config: CardConfig = merged.try_into().unwrap();
        assert_eq!(config.colors.chip, "#000");
        assert_eq!(config.colors.text, "#000000");
        assert_eq!(config.fonts.title, Path::new("fonts/GenShinGothic-Bold.ttf"));
    }

    #[test]
    fn mirror_dir_round_trips_through_defaults() {
        let merged = merge_toml(
            stock_defaults_value(),
            override_value("mirror", "dir", "/tmp/mirror"),
        );
        let config = resolve_config(merged, []).unwrap();
        assert_eq!(config.mirror.dir.as_deref(), Some(Path::new("/tmp/mirror")));
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: CardConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = CardConfig::default();
        assert_eq!(config.storage.upload_dir, defaults.storage.upload_dir);
        assert_eq!(config.storage.public_path, defaults.storage.public_path);
        assert_eq!(config.fonts.body, defaults.fonts.body);
        assert_eq!(config.colors.chip, defaults.colors.chip);
        assert!(config.mirror.dir.is_none());
        assert!(config.processing.max_processes.is_none());
    }

    #[test]
    fn effective_threads_clamps_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(99_999),
        };
        assert_eq!(effective_threads(&config), cores);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
        let one = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&one), 1);
    }
}
