//! Tool configuration.
//!
//! Loaded from `tagpack.toml` in the working directory when present; every
//! field has a default so the file is optional. Unknown keys are rejected to
//! catch typos early.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! storage_root = "."   # Where the export/ tree and export.zip live
//!
//! [session]
//! default_author = ""  # Pre-filled author for new records
//!
//! [thumbnails]
//! wide_edge = 200      # Target width for landscape thumbnails
//! tall_edge = 300      # Target height for portrait and square thumbnails
//! ```
//!
//! The thumbnail defaults match every previously produced export; changing
//! them makes regenerated thumbnails differ pixel-wise from archived ones.

use crate::imaging::{THUMB_TALL_EDGE, THUMB_WIDE_EDGE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file name looked up in the working directory.
pub const CONFIG_FILE: &str = "tagpack.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `tagpack.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagpackConfig {
    /// Directory holding the `export/` tree and the produced archive.
    pub storage_root: String,
    /// Session defaults.
    pub session: SessionConfig,
    /// Thumbnail target edges.
    pub thumbnails: ThumbnailsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Author pre-filled into every new record.
    pub default_author: String,
}

/// Thumbnail target edges: the scaled edge lands exactly on one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Target width for landscape sources (width > height).
    pub wide_edge: u32,
    /// Target height for portrait and square sources.
    pub tall_edge: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            wide_edge: THUMB_WIDE_EDGE,
            tall_edge: THUMB_TALL_EDGE,
        }
    }
}

impl ThumbnailsConfig {
    /// The `(wide_edge, tall_edge)` pair the dimension policy consumes.
    pub fn targets(&self) -> (u32, u32) {
        (self.wide_edge, self.tall_edge)
    }
}

impl Default for TagpackConfig {
    fn default() -> Self {
        Self {
            storage_root: ".".to_string(),
            session: SessionConfig::default(),
            thumbnails: ThumbnailsConfig::default(),
        }
    }
}

impl TagpackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_root.trim().is_empty() {
            return Err(ConfigError::Validation(
                "storage_root must not be empty".into(),
            ));
        }
        if self.thumbnails.wide_edge == 0 || self.thumbnails.tall_edge == 0 {
            return Err(ConfigError::Validation(
                "thumbnails edges must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Load config from `<dir>/tagpack.toml`, falling back to defaults when the
/// file does not exist.
pub fn load_config(dir: &Path) -> Result<TagpackConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    let config = if path.exists() {
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content)?
    } else {
        TagpackConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// A stock `tagpack.toml` with every option documented.
pub fn stock_config_toml() -> String {
    "\
# tagpack configuration. All options are optional - defaults shown.

# Where the export/ tree and export.zip live.
storage_root = \".\"

[session]
# Author pre-filled into every new record.
default_author = \"\"

[thumbnails]
# Target edges for generated thumbnails. The defaults match every
# previously produced export; changing them makes regenerated thumbnails
# differ pixel-wise from archived ones.
wide_edge = 200
tall_edge = 300
"
    .to_string()
}
