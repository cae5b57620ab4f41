//! Configuration for the registry host
//!
//! This module provides a trait-based configuration system that supports:
//! - Type-safe config structs via serde
//! - TOML file format
//! - Auto-generation of default configs
//! - Manual reload capability
//!
//! # Example
//!
//! ```ignore
//! use livetweak_core::{ConfigFile, Dispatcher, TweakConfig};
//!
//! let config = TweakConfig::load().unwrap_or_default();
//! livetweak_core::logging::init(&config);
//! let dispatcher = Dispatcher::new().with_config(&config);
//! ```

mod loader;

use std::path::Path;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use loader::{base_dir, config_path, CONFIG_ENV, CONFIG_FILE_NAME};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Could not determine the directory of the running executable
    #[error("Config directory not available - could not resolve executable location")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A TOML-backed configuration file.
///
/// # Requirements
///
/// Your config type must implement:
/// - `Default` - for generating initial config files
/// - `Serialize` - for saving to TOML
/// - `DeserializeOwned` - for loading from TOML
/// - `Send + Sync` - for thread-safe access
pub trait ConfigFile: Default + Serialize + DeserializeOwned + Send + Sync {
    /// Where [`load`](Self::load) and [`save`](Self::save) read and write
    fn path() -> ConfigResult<std::path::PathBuf>;

    /// Load config from the default path, creating it if missing.
    fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Save config to the default path.
    fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::path()?)
    }

    /// Reload config from the default path.
    fn reload(&mut self) -> ConfigResult<()> {
        self.reload_from(&Self::path()?)
    }

    /// Load config from `path`, creating a default file if missing.
    fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::debug!("Loaded config from {:?}", path);
            Ok(config)
        } else {
            let default = Self::default();
            default.save_to(path)?;
            tracing::info!("Created default config at {:?}", path);
            Ok(default)
        }
    }

    /// Save config to `path`.
    ///
    /// Creates parent directories if they don't exist.
    fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reload config from `path`, replacing self.
    fn reload_from(&mut self, path: &Path) -> ConfigResult<()> {
        let content = std::fs::read_to_string(path)?;
        *self = toml::from_str(&content)?;
        tracing::debug!("Reloaded config from {:?}", path);
        Ok(())
    }
}

/// Registry configuration.
///
/// Loaded from `$LIVETWEAK_CONFIG`, else `livetweak.toml` next to the
/// executable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweakConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// `tracing` filter directive; `RUST_LOG` takes precedence
    pub log_filter: String,

    /// Category for entries whose marker does not name one
    pub default_category: String,

    /// Bound of the cross-thread command queue
    pub queue_capacity: usize,
}

impl Default for TweakConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            log_filter: "info".to_string(),
            default_category: livetweak_sdk::DEFAULT_CATEGORY.to_string(),
            queue_capacity: 1024,
        }
    }
}

impl TweakConfig {
    /// Filter directive with `debug` applied
    pub fn effective_filter(&self) -> String {
        if self.debug {
            format!("{},livetweak_core=debug", self.log_filter)
        } else {
            self.log_filter.clone()
        }
    }
}

impl ConfigFile for TweakConfig {
    fn path() -> ConfigResult<std::path::PathBuf> {
        config_path()
    }
}
