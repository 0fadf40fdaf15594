//! Configuration management for cmod

use crate::comment::validator::{MAX_COMMENT_LENGTH, MAX_LINKS, MIN_COMMENT_LENGTH};
use crate::error::{ModerationError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage settings
    pub storage: StorageConfig,
    /// Spam classification settings
    pub validation: ValidationConfig,
    /// Moderation workflow settings
    pub moderation: ModerationConfig,
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ModerationError::Toml(e.to_string()))?;
        config.validate()?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Write configuration as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| ModerationError::Toml(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check values that would make the validator reject everything
    pub fn validate(&self) -> Result<()> {
        if self.validation.min_length > self.validation.max_length {
            return Err(ModerationError::Config(format!(
                "validation.min_length ({}) exceeds validation.max_length ({})",
                self.validation.min_length, self.validation.max_length
            )));
        }
        Ok(())
    }
}

/// Storage-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the JSON collections
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".cmod/data"),
        }
    }
}

/// Spam classification configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum trimmed text length in characters
    pub min_length: usize,
    /// Maximum trimmed text length in characters
    pub max_length: usize,
    /// Maximum number of http(s) links in text and site name
    pub max_links: usize,
    /// Case-insensitive terms that mark a comment as spam
    pub blocked_terms: Vec<String>,
    /// Treat comments without a well-formed email as spam
    pub require_email: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_length: MIN_COMMENT_LENGTH,
            max_length: MAX_COMMENT_LENGTH,
            max_links: MAX_LINKS,
            blocked_terms: Vec::new(),
            require_email: false,
        }
    }
}

/// Moderation workflow configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Approve comments that pass validation right away
    pub auto_approve: bool,
}
