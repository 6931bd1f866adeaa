//! Store configuration
//!
//! Loaded from a RON file, with fallback to hardcoded defaults.
//!
//! ```ron
//! (
//!     key_prefix: "magicTiles",
//!     data_dir: Some("/var/lib/tapkeep"),
//!     pretty_json: true,
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::save::{default_data_dir, StorageKeys, DEFAULT_KEY_PREFIX};

/// Config file name looked up in the platform config directory
pub const CONFIG_FILE_NAME: &str = "tapkeep.ron";

/// Config error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Prefix of the four storage keys
    pub key_prefix: String,
    /// Directory for file-backed storage (`None` = platform data dir)
    pub data_dir: Option<PathBuf>,
    /// Write indented JSON
    pub pretty_json: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            data_dir: None,
            pretty_json: false,
        }
    }
}

impl StoreConfig {
    /// Parse a config from RON text
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Load a config file; errors are returned
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load the config: an explicit path must load, otherwise the platform
    /// config file is used if present and readable, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => log::warn!("{}. Using defaults.", e),
                }
            }
        }

        Ok(Self::default())
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::with_prefix(&self.key_prefix)
    }

    /// Directory for file-backed storage
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

/// Path of the config file in the platform config directory
pub fn default_config_path() -> Option<PathBuf> {
    use directories::ProjectDirs;

    ProjectDirs::from("com", "tapkeep", "Tapkeep")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
