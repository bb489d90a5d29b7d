//! Site error types

use std::path::PathBuf;

/// Configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or schema error
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON syntax or schema error
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// Value outside its allowed range
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Offending field, dotted
        field: &'static str,
        /// What is wrong
        reason: String,
    },
}

/// Site boot failures
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A global subscriber was already installed
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] tracing_subscriber::util::TryInitError),

    /// Log filter directive did not parse
    #[error("invalid log filter: {0}")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),
}
