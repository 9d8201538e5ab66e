// SPDX-License-Identifier: GPL-3.0-only

//! Session configuration
//!
//! The session itself is transient; configuration is only ever read, either
//! from defaults or from a TOML file passed on the command line.

use crate::backends::camera::Facing;
use crate::constants::{
    DEFAULT_PREFERRED_HEIGHT, DEFAULT_PREFERRED_WIDTH, JPEG_QUALITY, MIN_JPEG_QUALITY, naming,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Camera used when the session starts
    pub initial_facing: Facing,
    /// Resolution hint for stream requests
    pub preferred_width: u32,
    pub preferred_height: u32,
    /// JPEG quality for captures, clamped to at least 90
    pub jpeg_quality: u8,
    /// Where downloads and documents are written (default: user download dir)
    pub download_dir: Option<PathBuf>,
    /// Title attached to share requests
    pub share_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_facing: Facing::Front,
            preferred_width: DEFAULT_PREFERRED_WIDTH,
            preferred_height: DEFAULT_PREFERRED_HEIGHT,
            jpeg_quality: JPEG_QUALITY,
            download_dir: None,
            share_title: naming::SHARE_TITLE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text; missing keys take defaults
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.preferred_width == 0 || self.preferred_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "preferred resolution {}x{} must be positive",
                self.preferred_width, self.preferred_height
            )));
        }
        if self.jpeg_quality > 100 {
            return Err(ConfigError::Invalid(format!(
                "jpeg_quality {} is above 100",
                self.jpeg_quality
            )));
        }
        Ok(())
    }

    /// Effective JPEG quality
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality.clamp(MIN_JPEG_QUALITY, 100)
    }

    /// Effective download directory
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(crate::storage::default_download_dir)
    }
}

/// Configuration loading errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io { path: PathBuf, message: String },
    Parse { path: Option<PathBuf>, message: String },
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, message } => {
                write!(f, "Failed to read config '{}': {}", path.display(), message)
            }
            ConfigError::Parse {
                path: Some(path),
                message,
            } => write!(f, "Failed to parse config '{}': {}", path.display(), message),
            ConfigError::Parse {
                path: None,
                message,
            } => write!(f, "Failed to parse config: {}", message),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
