//! Configuration loading from file system
//!
//! Reads the JSON config file. `load_config_from` degrades any failure to
//! `Config::default()` with a logged warning; a missing file is not a failure.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, instrument};

use super::defaults::DEFAULT_CONFIG_PATH;
use super::types::Config;
use crate::error::{EmmetError, Result, ResultExt};

/// Path of the user config file (~/.emmet/config.json)
pub fn config_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).as_ref())
}

/// Load configuration from ~/.emmet/config.json
pub fn load_config() -> Config {
    load_config_from(&config_path())
}

/// Load configuration from `path`.
///
/// Returns Config::default() if the file is missing, unreadable or malformed.
pub fn load_config_from(path: &Path) -> Config {
    try_load_config_from(path).warn_on_err().unwrap_or_default()
}

/// Load configuration from `path`, reporting unreadable or malformed files.
///
/// A missing file is not an error and yields Config::default().
#[instrument(name = "load_config")]
pub fn try_load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        info!(path = %path.display(), "Config file not found, using defaults");
        return Ok(Config::default());
    }

    let config = read_config(path).map_err(|e| EmmetError::Config(format!("{:#}", e)))?;
    info!(path = %path.display(), "Successfully loaded config");
    Ok(config)
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
