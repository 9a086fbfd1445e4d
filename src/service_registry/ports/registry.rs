//! Registry port: the authoritative capability-type to target mapping.

use crate::service_registry::domain::{
    CapabilityType, HealthState, ServiceCategory, ServiceTarget, TargetHealth, TargetId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for service registry operations.
pub type ServiceRegistryResult<T> = Result<T, ServiceRegistryError>;

/// Key/value store of service targets, partitioned by category.
///
/// Every mutation is individually atomic. Concurrent writes to the same
/// `(capability_type, category)` slot resolve last-write-wins; there are no
/// cross-key transactions.
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    /// Upserts a target into its category, replacing any entry for the same
    /// capability type.
    async fn register(&self, target: &ServiceTarget) -> ServiceRegistryResult<()>;

    /// Removes the entry for the target's type from the target's category.
    ///
    /// Entries for the same type under another category are left alone.
    /// Returns whether an entry was removed.
    async fn deregister(&self, target: &ServiceTarget) -> ServiceRegistryResult<bool>;

    /// Looks up the target serving `capability_type` under `category`.
    async fn get_service(
        &self,
        capability_type: &CapabilityType,
        category: ServiceCategory,
    ) -> ServiceRegistryResult<Option<ServiceTarget>>;

    /// Lists every target registered under `category`.
    async fn get_entries(&self, category: ServiceCategory)
    -> ServiceRegistryResult<Vec<ServiceTarget>>;

    /// Replaces the configuration of an existing entry, keeping its
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError::NotFound`] when the slot is empty.
    async fn update(&self, target: &ServiceTarget) -> ServiceRegistryResult<ServiceTarget>;

    /// Sets one configuration option on every category entry for
    /// `capability_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError::NotFound`] when no category holds the
    /// type.
    async fn update_option(
        &self,
        capability_type: &CapabilityType,
        option: &str,
        value: &str,
    ) -> ServiceRegistryResult<Vec<ServiceTarget>>;

    /// Finds a target by its assigned identifier.
    async fn find_by_id(&self, id: &TargetId) -> ServiceRegistryResult<Option<ServiceTarget>>;

    /// Records provider contact for a registered identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError::UnknownTarget`] for unknown ids.
    async fn record_ping(&self, id: &TargetId, at: DateTime<Utc>) -> ServiceRegistryResult<()>;

    /// Records an explicit health report for a registered identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError::UnknownTarget`] for unknown ids.
    async fn record_health(&self, id: &TargetId, state: HealthState)
    -> ServiceRegistryResult<()>;

    /// Returns the liveness record for an identifier.
    async fn health(&self, id: &TargetId) -> ServiceRegistryResult<Option<TargetHealth>>;

    /// Lists targets whose last contact is strictly older than `cutoff`.
    async fn silent_since(&self, cutoff: DateTime<Utc>)
    -> ServiceRegistryResult<Vec<ServiceTarget>>;
}

/// Errors returned by service registry implementations.
#[derive(Debug, Clone, Error)]
pub enum ServiceRegistryError {
    /// No entry occupies the requested slot.
    #[error("no {category} target registered for capability type {capability_type}")]
    NotFound {
        /// Requested capability type.
        capability_type: CapabilityType,
        /// Requested category, or every category for option updates.
        category: String,
    },

    /// No target carries the given identifier.
    #[error("unknown target identifier: {0}")]
    UnknownTarget(TargetId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ServiceRegistryError {
    /// Builds a not-found error for one category slot.
    #[must_use]
    pub fn not_found(capability_type: &CapabilityType, category: ServiceCategory) -> Self {
        Self::NotFound {
            capability_type: capability_type.clone(),
            category: category.to_string(),
        }
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
