//! Configuration resolution for the carsync CLI.

use anyhow::{Context, Result};
use carsync_client::ClientConfig;
use std::path::{Path, PathBuf};

/// Default config file name inside the user config directory.
pub const CONFIG_FILE: &str = "carsync.toml";

/// Resolve the effective configuration.
///
/// An explicit `--config` path must exist. Without one, the default path is
/// read when present and defaults apply otherwise. `base_url` (from
/// `--base-url` or `CARSYNC_BASE_URL`) wins over the file.
pub fn load(explicit: Option<&Path>, base_url: Option<&str>) -> Result<ClientConfig> {
    let config = match explicit {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match default_config_path() {
            Some(path) => ClientConfig::from_file_or_default(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ClientConfig::default(),
        },
    };

    Ok(match base_url {
        Some(url) => config.with_base_url(url),
        None => config,
    })
}

/// Get the default config file path for carsync.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "carsync", "carsync")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
