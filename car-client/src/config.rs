//! Configuration loading for carsync.
//!
//! Configuration is loaded from a TOML file. Every section and key is
//! optional.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::store::{StoreConfig, DEFAULT_BASE_URL, DEFAULT_LIST_LIMIT};

/// Root configuration for carsync.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    /// Remote collection configuration.
    #[serde(default)]
    pub store: StoreSection,
    /// Search input configuration.
    #[serde(default)]
    pub search: SearchSection,
}

/// Remote collection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    /// Root URL of the collection (default: http://localhost:3001).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// `_limit` sent with list requests (default: 9999).
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Search input configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSection {
    /// Quiescence delay before a query is applied (default: 300).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

// Default value functions
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_list_limit() -> u32 {
    DEFAULT_LIST_LIMIT
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            list_limit: default_list_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load `path` if it exists, otherwise use defaults.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.store.base_url = base_url.into();
        self
    }

    /// Settings for [`crate::HttpCarStore`].
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            base_url: self.store.base_url.clone(),
            list_limit: self.store.list_limit,
            timeout: Duration::from_secs(self.store.timeout_secs),
        }
    }

    /// Debounce delay for search input.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
