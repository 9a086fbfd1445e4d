//! Tracing subscriber installation for router and provider processes.
//!
//! The library only emits `tracing` events; binaries and tests decide
//! whether and how to collect them by calling [`init_tracing`].

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The fallback filter directive does not parse.
    #[error("invalid log filter directive '{directive}': {message}")]
    InvalidDirective {
        /// Directive that failed.
        directive: String,
        /// Parser message.
        message: String,
    },
    /// A global subscriber is already installed.
    #[error("tracing subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Installs a formatted subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive` (for example `switchyard=info`).
///
/// # Errors
///
/// Returns [`TelemetryError`] when the fallback directive is invalid or a
/// subscriber is already installed.
pub fn init_tracing(default_directive: &str) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive).map_err(|err| {
            TelemetryError::InvalidDirective {
                directive: default_directive.to_owned(),
                message: err.to_string(),
            }
        })?,
    };
    Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .map_err(|err| TelemetryError::AlreadyInstalled(err.to_string()))
}
