//! Config path resolution
//!
//! The config file lives next to the running executable unless
//! `LIVETWEAK_CONFIG` points somewhere else.

use std::path::PathBuf;

use super::{ConfigError, ConfigResult};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "LIVETWEAK_CONFIG";

/// File name used next to the executable
pub const CONFIG_FILE_NAME: &str = "livetweak.toml";

/// Returns the directory containing the running executable.
pub fn base_dir() -> ConfigResult<PathBuf> {
    let exe = std::env::current_exe().map_err(ConfigError::IoError)?;
    exe.parent()
        .map(PathBuf::from)
        .ok_or(ConfigError::NoConfigDirectory)
}

/// Returns the config file path.
///
/// Path: `$LIVETWEAK_CONFIG`, else `<exe dir>/livetweak.toml`
pub fn config_path() -> ConfigResult<PathBuf> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(base_dir()?.join(CONFIG_FILE_NAME)),
    }
}
