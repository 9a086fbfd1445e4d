//! Router-side handling of the provider registration protocol.

use crate::service_registry::{
    domain::{
        CapabilityType, HealthReport, ServiceCategory, ServiceTarget, TargetHealth, TargetId,
    },
    ports::{ServiceRegistry, ServiceRegistryError},
};
use chrono::{DateTime, Duration};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for target registration.
#[derive(Debug, Error)]
pub enum TargetRegistryServiceError {
    /// Registry operation failed.
    #[error(transparent)]
    Registry(#[from] ServiceRegistryError),
}

/// Result type for target registration service operations.
pub type TargetRegistryServiceResult<T> = Result<T, TargetRegistryServiceError>;

/// Target registration orchestration service.
#[derive(Clone)]
pub struct TargetRegistryService<R, C>
where
    R: ServiceRegistry,
    C: Clock + Send + Sync,
{
    registry: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TargetRegistryService<R, C>
where
    R: ServiceRegistry,
    C: Clock + Send + Sync,
{
    /// Creates a new target registration service.
    #[must_use]
    pub const fn new(registry: Arc<R>, clock: Arc<C>) -> Self {
        Self { registry, clock }
    }

    /// Returns the underlying registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    /// Registers a target, assigning an identifier when it carries none.
    ///
    /// A provider presenting a previously assigned identifier keeps it. The
    /// stored entry replaces whatever occupied the same slot.
    ///
    /// # Errors
    ///
    /// Returns [`TargetRegistryServiceError::Registry`] when the registry
    /// rejects the write.
    pub async fn register(
        &self,
        mut target: ServiceTarget,
    ) -> TargetRegistryServiceResult<ServiceTarget> {
        if target.id().is_none() {
            target.assign_id(TargetId::generate());
        }
        self.registry.register(&target).await?;
        if let Some(id) = target.id() {
            self.registry.record_ping(id, self.clock.utc()).await?;
        }
        info!(
            capability_type = %target.capability_type(),
            category = %target.category(),
            address = %target.address(),
            target_id = ?target.id().map(TargetId::as_str),
            "registered service target"
        );
        Ok(target)
    }

    /// Removes a target from its category.
    ///
    /// Returns whether an entry was removed.
    ///
    /// # Errors
    ///
    /// Returns registry failures.
    pub async fn deregister(&self, target: &ServiceTarget) -> TargetRegistryServiceResult<bool> {
        let removed = self.registry.deregister(target).await?;
        info!(
            capability_type = %target.capability_type(),
            category = %target.category(),
            removed,
            "deregistered service target"
        );
        Ok(removed)
    }

    /// Records a liveness ping.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError::UnknownTarget`] (wrapped) when the id
    /// is not registered.
    pub async fn ping(&self, id: &TargetId) -> TargetRegistryServiceResult<()> {
        self.registry.record_ping(id, self.clock.utc()).await?;
        debug!(target_id = %id, "target ping");
        Ok(())
    }

    /// Records an explicit health report.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError::UnknownTarget`] (wrapped) when the id
    /// is not registered.
    pub async fn update_state(
        &self,
        id: &TargetId,
        report: HealthReport,
    ) -> TargetRegistryServiceResult<()> {
        let healthy = report.is_healthy();
        self.registry
            .record_health(id, report.at(self.clock.utc()))
            .await?;
        debug!(target_id = %id, healthy, "target health updated");
        Ok(())
    }

    /// Lists targets registered under a category.
    ///
    /// # Errors
    ///
    /// Returns registry failures.
    pub async fn list(
        &self,
        category: ServiceCategory,
    ) -> TargetRegistryServiceResult<Vec<ServiceTarget>> {
        Ok(self.registry.get_entries(category).await?)
    }

    /// Looks up one slot.
    ///
    /// # Errors
    ///
    /// Returns registry failures.
    pub async fn find(
        &self,
        capability_type: &CapabilityType,
        category: ServiceCategory,
    ) -> TargetRegistryServiceResult<Option<ServiceTarget>> {
        Ok(self.registry.get_service(capability_type, category).await?)
    }

    /// Returns the liveness record for an identifier.
    ///
    /// # Errors
    ///
    /// Returns registry failures.
    pub async fn health(&self, id: &TargetId) -> TargetRegistryServiceResult<Option<TargetHealth>> {
        Ok(self.registry.health(id).await?)
    }

    /// Replaces an existing entry's address and configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError::NotFound`] (wrapped) when the slot is
    /// empty.
    pub async fn update(
        &self,
        target: &ServiceTarget,
    ) -> TargetRegistryServiceResult<ServiceTarget> {
        Ok(self.registry.update(target).await?)
    }

    /// Sets one configuration option on every entry for a capability type.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError::NotFound`] (wrapped) when no category
    /// holds the type.
    pub async fn update_option(
        &self,
        capability_type: &CapabilityType,
        option: &str,
        value: &str,
    ) -> TargetRegistryServiceResult<Vec<ServiceTarget>> {
        Ok(self
            .registry
            .update_option(capability_type, option, value)
            .await?)
    }

    /// Lists targets that have not contacted the router for longer than
    /// `max_silence`.
    ///
    /// A threshold reaching past the representable range uses the Unix epoch
    /// as the cutoff.
    ///
    /// # Errors
    ///
    /// Returns registry failures.
    pub async fn stale_targets(
        &self,
        max_silence: Duration,
    ) -> TargetRegistryServiceResult<Vec<ServiceTarget>> {
        let cutoff = self
            .clock
            .utc()
            .checked_sub_signed(max_silence)
            .unwrap_or(DateTime::UNIX_EPOCH);
        Ok(self.registry.silent_since(cutoff).await?)
    }

    /// Deregisters every stale target and returns what was removed.
    ///
    /// Nothing calls this implicitly: stale targets stay resolvable until an
    /// operator or scheduler evicts them.
    ///
    /// # Errors
    ///
    /// Returns registry failures; targets removed before the failure stay
    /// removed.
    pub async fn evict_stale(
        &self,
        max_silence: Duration,
    ) -> TargetRegistryServiceResult<Vec<ServiceTarget>> {
        let mut evicted = Vec::new();
        for target in self.stale_targets(max_silence).await? {
            if self.registry.deregister(&target).await? {
                info!(
                    capability_type = %target.capability_type(),
                    category = %target.category(),
                    address = %target.address(),
                    "evicted stale service target"
                );
                evicted.push(target);
            }
        }
        Ok(evicted)
    }
}
