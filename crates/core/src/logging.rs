//! Logging setup
//!
//! The registry logs through `tracing`. Hosts that do not install their own
//! subscriber can call [`init`].

use tracing_subscriber::EnvFilter;

use crate::config::TweakConfig;

/// Install a fmt subscriber filtered by `RUST_LOG`, else the configured filter
///
/// Returns `false` if a global subscriber was already set.
pub fn init(config: &TweakConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.effective_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
