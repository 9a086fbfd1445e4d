//! Runs the capability router's registration API.
//!
//! Usage:
//!
//! ```text
//! switchyard_router [settings-path]
//! ```
//!
//! Without a path the router starts with default [`RouterSettings`]. With
//! one, the JSON file at that path overrides any subset of them:
//!
//! ```json
//! {
//!   "bind_address": "0.0.0.0:8080",
//!   "request_timeout_ms": 30000,
//!   "stale_after_secs": 300
//! }
//! ```
//!
//! Log output is controlled by `RUST_LOG` and defaults to `info`.

use camino::Utf8PathBuf;
use std::process::ExitCode;
use switchyard::config::{ConfigError, RouterSettings, load_json};
use switchyard::runtime::CapabilityRouter;
use switchyard::telemetry::init_tracing;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
enum RouterExit {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("registration API failed: {0}")]
    Io(#[from] std::io::Error),
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "cannot listen for ctrl-c; shutting down");
    }
    info!("shutdown requested");
}

async fn run() -> Result<(), RouterExit> {
    let settings = match std::env::args().nth(1) {
        Some(path) => load_json::<RouterSettings>(&Utf8PathBuf::from(path))?,
        None => RouterSettings::default(),
    };
    let router = CapabilityRouter::new(settings)?;
    let listener = router.bind().await?;
    router.serve(listener, shutdown_signal()).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    if init_tracing("info").is_err() {
        return ExitCode::FAILURE;
    }
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "capability router exited");
            ExitCode::FAILURE
        }
    }
}
