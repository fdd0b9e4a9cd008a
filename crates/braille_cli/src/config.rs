//! Boundary settings for the CLI.
//!
//! Loaded from `--config <path>`, else `<config dir>/braille-ascii/config.toml` when present.

use std::path::{Path, PathBuf};

use braille_render::DecodeLimits;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config file '{path}': {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub default_width: u32,
    pub min_width: u32,
    pub max_width: u32,
    pub min_image_dimension: u32,
    pub max_image_dimension: u32,
    /// Largest accepted input file, in bytes.
    pub max_file_size: usize,
    pub include_metadata: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_width: 100,
            min_width: 15,
            max_width: 200,
            min_image_dimension: 10,
            max_image_dimension: 10_000,
            max_file_size: 10 * 1024 * 1024,
            include_metadata: false,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or the default location when `path` is `None`.
    ///
    /// An explicitly given path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        if !required && !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Io { path: path.clone(), source })?;
        let settings: Settings = toml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        settings.validate()?;
        log::debug!("loaded config from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_width == 0 {
            return Err(ConfigError::Invalid("min_width must be at least 1".into()));
        }
        if self.min_width > self.max_width {
            return Err(ConfigError::Invalid(format!(
                "min_width ({}) exceeds max_width ({})",
                self.min_width, self.max_width
            )));
        }
        if !(self.min_width..=self.max_width).contains(&self.default_width) {
            return Err(ConfigError::Invalid(format!(
                "default_width must be between {} and {}, got {}",
                self.min_width, self.max_width, self.default_width
            )));
        }
        if self.min_image_dimension > self.max_image_dimension {
            return Err(ConfigError::Invalid(format!(
                "min_image_dimension ({}) exceeds max_image_dimension ({})",
                self.min_image_dimension, self.max_image_dimension
            )));
        }
        Ok(())
    }

    pub fn decode_limits(&self) -> DecodeLimits {
        DecodeLimits {
            min_dimension: self.min_image_dimension,
            max_dimension: self.max_image_dimension,
            max_bytes: self.max_file_size,
        }
    }

    /// Resolve the requested width against the accepted range.
    pub fn width(&self, requested: Option<u32>) -> Result<u32, ConfigError> {
        let width = requested.unwrap_or(self.default_width);
        if (self.min_width..=self.max_width).contains(&width) {
            Ok(width)
        } else {
            Err(ConfigError::Invalid(format!(
                "width must be between {} and {}, got {width}",
                self.min_width, self.max_width
            )))
        }
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("braille-ascii").join("config.toml"))
}
