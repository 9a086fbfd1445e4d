//! Errors surfaced by proxied calls.

use crate::proxy::ports::TransportError;
use crate::service_registry::{
    domain::{CapabilityType, ServiceAddress, ServiceCategory},
    ports::ServiceRegistryError,
    services::ResolveError,
};
use thiserror::Error;

/// Result type for proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Errors returned by proxy orchestration.
///
/// Callers tell "nobody implements this" ([`ProxyError::NotFound`]) apart
/// from "the implementer is down" ([`ProxyError::ServiceUnavailable`]).
#[derive(Debug, Clone, Error)]
pub enum ProxyError {
    /// No provider is registered for the capability type.
    #[error("there is no host registered for {category} service {capability_type}")]
    NotFound {
        /// Requested capability type.
        capability_type: CapabilityType,
        /// Category searched.
        category: ServiceCategory,
    },

    /// The resolved provider could not be reached or answered badly.
    #[error("service at {address} is unavailable: {source}")]
    ServiceUnavailable {
        /// Address of the resolved provider.
        address: ServiceAddress,
        /// Transport fault.
        #[source]
        source: TransportError,
    },

    /// The registry failed during resolution.
    #[error(transparent)]
    Registry(#[from] ServiceRegistryError),
}

impl From<ResolveError> for ProxyError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound {
                capability_type,
                category,
            } => Self::NotFound {
                capability_type,
                category,
            },
            ResolveError::Registry(registry) => Self::Registry(registry),
        }
    }
}

impl From<TransportError> for ProxyError {
    fn from(err: TransportError) -> Self {
        Self::ServiceUnavailable {
            address: err.address().clone(),
            source: err,
        }
    }
}
