//! Transport port between proxies and capability providers.

use crate::proxy::domain::{Configuration, InquireReply, ProvisioningReference, Secret};
use crate::service_registry::domain::{ServiceAddress, ServiceTarget};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Request/reply exchange with a resolved target.
///
/// Implementations own their connections: opened lazily, reused across calls
/// to the same target, replaced when the target's address changes, and
/// released on every exit path including cancellation.
#[async_trait]
pub trait ProxyTransport<Req, Resp>: Send + Sync
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    /// Sends one request and waits for its reply.
    async fn send(&self, request: Req, target: &ServiceTarget) -> TransportResult<Resp>;

    /// Pushes configuration and secret material to a provider.
    async fn provision(
        &self,
        configuration: Configuration,
        secret: Secret,
        target: &ServiceTarget,
    ) -> TransportResult<ProvisioningReference>;

    /// Asks a provider which configuration keys it understands.
    async fn inquire(&self, target: &ServiceTarget) -> TransportResult<InquireReply>;

    /// Returns whether the transport still accepts calls.
    fn is_healthy(&self) -> bool;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "transport"
    }

    /// Releases every cached connection; later calls fail with
    /// [`TransportError::Closed`].
    async fn close(&self);
}

/// Transport faults, each naming the target address.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Connecting, reading or writing failed.
    #[error("connection to {address} failed: {source}")]
    Connection {
        /// Target address.
        address: ServiceAddress,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The operation did not finish in time.
    #[error("{operation} against {address} timed out after {after:?}")]
    Timeout {
        /// Target address.
        address: ServiceAddress,
        /// Operation that timed out.
        operation: &'static str,
        /// Configured limit.
        after: Duration,
    },

    /// The peer answered with something other than the expected reply.
    #[error("protocol fault from {address}: {message}")]
    Protocol {
        /// Target address.
        address: ServiceAddress,
        /// What was wrong with the reply.
        message: String,
    },

    /// The transport was closed.
    #[error("transport closed; refusing call to {address}")]
    Closed {
        /// Target address.
        address: ServiceAddress,
    },
}

impl TransportError {
    /// Wraps an I/O error for `address`.
    #[must_use]
    pub fn connection(address: &ServiceAddress, err: std::io::Error) -> Self {
        Self::Connection {
            address: address.clone(),
            source: Arc::new(err),
        }
    }

    /// Builds a protocol fault for `address`.
    #[must_use]
    pub fn protocol(address: &ServiceAddress, message: impl Into<String>) -> Self {
        Self::Protocol {
            address: address.clone(),
            message: message.into(),
        }
    }

    /// Returns the address of the target involved.
    #[must_use]
    pub const fn address(&self) -> &ServiceAddress {
        match self {
            Self::Connection { address, .. }
            | Self::Timeout { address, .. }
            | Self::Protocol { address, .. }
            | Self::Closed { address } => address,
        }
    }
}
