//! Logging initialisation

use crate::config::{LogConfig, LogFormat};
use crate::error::SiteError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter from `RUST_LOG`, else the configured directive
///
/// # Errors
/// The configured directive does not parse.
pub fn env_filter(config: &LogConfig) -> Result<EnvFilter, SiteError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(&config.filter)?),
    }
}

/// Install the global subscriber. Call once per process.
///
/// # Errors
/// A bad filter directive, or a subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<(), SiteError> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Pretty => registry.with(fmt::layer()).try_init()?,
        LogFormat::Json => registry.with(fmt::layer().json()).try_init()?,
    }

    tracing::debug!(format = ?config.format, "Logging initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_directive_is_reported() {
        let config = LogConfig {
            filter: "zen_forum=loud".to_owned(),
            ..LogConfig::default()
        };
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(matches!(env_filter(&config), Err(SiteError::LogFilter(_))));
        }
    }

    #[test]
    fn default_directive_parses() {
        assert!(env_filter(&LogConfig::default()).is_ok());
    }
}
