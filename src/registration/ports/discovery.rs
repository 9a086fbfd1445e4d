//! Discovery port: the provider's view of the router's registration API.

use crate::service_registry::domain::{HealthReport, ServiceTarget, TargetId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for discovery client operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Client of the router's registration protocol.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiscoveryClient: Send + Sync {
    /// Registers a target and returns it as the router stored it, possibly
    /// with a newly assigned identifier.
    async fn register(&self, target: &ServiceTarget) -> DiscoveryResult<ServiceTarget>;

    /// Removes a target from the router.
    async fn deregister(&self, target: &ServiceTarget) -> DiscoveryResult<()>;

    /// Reports liveness.
    async fn ping(&self, id: &TargetId) -> DiscoveryResult<()>;

    /// Reports an explicit health state.
    async fn update_state(&self, id: &TargetId, report: &HealthReport) -> DiscoveryResult<()>;
}

/// Errors returned by discovery clients.
#[derive(Debug, Clone, Error)]
pub enum DiscoveryError {
    /// The router could not be reached.
    #[error("router unreachable: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The router answered with a non-success status.
    #[error("router answered with status {status}: {message}")]
    Status {
        /// HTTP-style status code.
        status: u16,
        /// Error text from the router.
        message: String,
    },

    /// The router's answer could not be interpreted.
    #[error("malformed router response: {0}")]
    MalformedResponse(String),
}

impl DiscoveryError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
