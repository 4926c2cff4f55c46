//! Log subscriber setup.
//!
//! The library itself only emits `tracing` events. Applications that want to
//! see them can call [`init`] once at startup.

use citecompass_config::LoggingConfig;
use tracing_subscriber::EnvFilter;

use crate::error::CiteError;

/// Build the event filter: `RUST_LOG` if set, otherwise the configured level.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install a global `fmt` subscriber filtered by [`env_filter`].
///
/// Fails if a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), CiteError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .try_init()
        .map_err(|e| CiteError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_fails() {
        let config = LoggingConfig::default();
        let _ = init(&config);
        assert!(matches!(init(&config), Err(CiteError::Logging(_))));
    }

    #[test]
    fn test_env_filter_uses_configured_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            level: "debug".to_string(),
        };
        assert_eq!(env_filter(&config).to_string(), "debug");
    }
}
