//! Server configuration module.
//!
//! Handles loading, validating, and merging `lorem.toml`. Stock defaults are
//! the base layer; the user file only needs the keys it wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [server]
//! addr = "0.0.0.0:8080"       # Address the HTTP server binds to
//!
//! [assets]
//! fonts_dir = "fonts"         # Relative to the working directory
//! font_file = "DejaVuSansMono.ttf"
//! templates_dir = "templates"
//! home_template = "home.html"
//! static_dir = "assets"       # Served under /assets/
//!
//! [encoding]
//! jpeg_quality = 75           # 1-100
//! max_pixels = 25000000       # Larger requests get a 500
//! ```
//!
//! Unknown keys are rejected to catch typos early. The `--addr` flag of
//! `serve` overrides `server.addr`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::imaging::{DEFAULT_MAX_PIXELS, Quality};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Server configuration loaded from `lorem.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Network settings.
    pub server: NetworkConfig,
    /// Read-only asset locations.
    pub assets: AssetsConfig,
    /// Encoder settings.
    pub encoding: EncodingConfig,
}

impl ServerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.addr.trim().is_empty() {
            return Err(ConfigError::Validation("server.addr must not be empty".into()));
        }
        if !(1..=100).contains(&self.encoding.jpeg_quality) {
            return Err(ConfigError::Validation(
                "encoding.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.encoding.max_pixels == 0 {
            return Err(ConfigError::Validation(
                "encoding.max_pixels must be positive".into(),
            ));
        }
        if self.assets.font_file.is_empty() || self.assets.home_template.is_empty() {
            return Err(ConfigError::Validation(
                "assets.font_file and assets.home_template must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Listener bind address, `host:port`.
    pub addr: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Locations of the fonts, templates and static files.
///
/// Relative paths resolve against the process working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    pub fonts_dir: PathBuf,
    /// Monospace font used for all text.
    pub font_file: String,
    pub templates_dir: PathBuf,
    /// Landing page template, inside `templates_dir`.
    pub home_template: String,
    /// Directory served under `/assets/`.
    pub static_dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            fonts_dir: PathBuf::from("fonts"),
            font_file: "DejaVuSansMono.ttf".to_string(),
            templates_dir: PathBuf::from("templates"),
            home_template: "home.html".to_string(),
            static_dir: PathBuf::from("assets"),
        }
    }
}

impl AssetsConfig {
    pub fn font_path(&self) -> PathBuf {
        self.fonts_dir.join(&self.font_file)
    }

    pub fn home_template_path(&self) -> PathBuf {
        self.templates_dir.join(&self.home_template)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodingConfig {
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub jpeg_quality: u32,
    /// Largest canvas (width x height) a request may ask for.
    pub max_pixels: u64,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: Quality::default().value(),
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

impl EncodingConfig {
    pub fn quality(&self) -> Quality {
        Quality::new(self.jpeg_quality)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ServerConfig::default()).expect("default config must serialize")
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

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ServerConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ServerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the file at `path`.
///
/// A missing file yields the stock defaults. A file that exists but holds
/// invalid TOML, unknown keys or out-of-range values is an error.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    if !path.exists() {
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Returns a fully-commented stock `lorem.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# lorem-picsum configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Network
# ---------------------------------------------------------------------------
[server]
# Address the HTTP server binds to. `serve --addr` overrides this.
addr = "0.0.0.0:8080"

# ---------------------------------------------------------------------------
# Assets (relative paths resolve against the working directory)
# ---------------------------------------------------------------------------
[assets]
# Directory holding the font file.
fonts_dir = "fonts"

# Monospace TrueType/OpenType font used for all text.
font_file = "DejaVuSansMono.ttf"

# Directory holding the landing page template.
templates_dir = "templates"

# Landing page template served at `/`. Parsed once, on first use.
home_template = "home.html"

# Directory served under /assets/ (landing page script and stylesheet).
static_dir = "assets"

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[encoding]
# JPEG encoding quality (1 = worst, 100 = best). PNG and GIF are lossless.
jpeg_quality = 75

# Largest image, in pixels (width x height), a request may ask for.
# Larger requests are answered with a 500 instead of being allocated.
max_pixels = 25000000
"##
}
