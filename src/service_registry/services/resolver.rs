//! Resolution of capability types to live targets.

use crate::service_registry::{
    domain::{CapabilityType, ServiceCategory, ServiceTarget},
    ports::{ServiceRegistry, ServiceRegistryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`ServiceResolver::resolve`].
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// Nobody implements the capability type under the category.
    #[error("there is no host registered for {category} service {capability_type}")]
    NotFound {
        /// Requested capability type.
        capability_type: CapabilityType,
        /// Requested category.
        category: ServiceCategory,
    },
    /// The registry itself failed.
    #[error(transparent)]
    Registry(#[from] ServiceRegistryError),
}

/// Read path from `(capability type, category)` to one target.
///
/// Resolution never performs network I/O and never consults health: a target
/// stays resolvable until it is deregistered or evicted.
#[derive(Clone)]
pub struct ServiceResolver<R>
where
    R: ServiceRegistry,
{
    registry: Arc<R>,
}

impl<R> ServiceResolver<R>
where
    R: ServiceRegistry,
{
    /// Creates a resolver over the given registry.
    #[must_use]
    pub const fn new(registry: Arc<R>) -> Self {
        Self { registry }
    }

    /// Resolves the target currently serving `capability_type` under
    /// `category`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] when no target occupies the slot,
    /// or [`ResolveError::Registry`] when the registry lookup fails.
    pub async fn resolve(
        &self,
        capability_type: &CapabilityType,
        category: ServiceCategory,
    ) -> Result<ServiceTarget, ResolveError> {
        self.registry
            .get_service(capability_type, category)
            .await?
            .ok_or_else(|| ResolveError::NotFound {
                capability_type: capability_type.clone(),
                category,
            })
    }
}
