//! Tracing subscriber setup for the `kedge` binary.

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LoggingConfig;

/// Environment variable holding a `tracing` filter directive. Takes
/// precedence over [`LoggingConfig::log_level`].
pub const LOG_FILTER_ENV: &str = "KEDGE_LOG";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum TelemetryError {
    /// The configured filter directive does not parse.
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter {
        /// Directive that failed to parse.
        directive: String,
        /// Parser error.
        message: String,
    },
    /// A global subscriber was already installed.
    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Builds the filter from `KEDGE_LOG`, falling back to the configured level.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when the fallback directive
/// does not parse.
pub fn filter(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_env(LOG_FILTER_ENV).or_else(|_| {
        EnvFilter::try_new(&config.log_level).map_err(|err| TelemetryError::InvalidFilter {
            directive: config.log_level.clone(),
            message: err.to_string(),
        })
    })
}

/// Installs the global subscriber. Logs go to stderr so stdout stays free
/// for the operation report.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is invalid or a subscriber is
/// already installed.
pub fn init(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let env_filter = filter(config)?;
    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = if config.log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
    };
    installed.map_err(|err| TelemetryError::Install(err.to_string()))
}
