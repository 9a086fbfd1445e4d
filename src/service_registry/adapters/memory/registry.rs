//! Thread-safe in-memory registry backing a single router instance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::service_registry::{
    domain::{
        CapabilityType, HealthState, ServiceCategory, ServiceTarget, TargetHealth, TargetId,
    },
    ports::{ServiceRegistry, ServiceRegistryError, ServiceRegistryResult},
};

type Slot = (ServiceCategory, CapabilityType);

/// In-memory registry keyed by category and capability type.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServiceRegistry {
    state: Arc<RwLock<InMemoryRegistryState>>,
}

#[derive(Debug, Default)]
struct InMemoryRegistryState {
    entries: BTreeMap<ServiceCategory, BTreeMap<CapabilityType, ServiceTarget>>,
    id_index: HashMap<TargetId, Slot>,
    health: HashMap<TargetId, TargetHealth>,
}

impl InMemoryRegistryState {
    fn slot(&self, slot: &Slot) -> Option<&ServiceTarget> {
        self.entries
            .get(&slot.0)
            .and_then(|category| category.get(&slot.1))
    }

    fn forget_id(&mut self, id: &TargetId) {
        self.id_index.remove(id);
        self.health.remove(id);
    }

    fn insert(&mut self, target: ServiceTarget) {
        let slot = (target.category(), target.capability_type().clone());
        let previous_id = self.slot(&slot).and_then(ServiceTarget::id).cloned();
        if let Some(old_id) = previous_id
            && target.id() != Some(&old_id)
        {
            self.forget_id(&old_id);
        }
        if let Some(id) = target.id() {
            self.id_index.insert(id.clone(), slot.clone());
        }
        self.entries
            .entry(slot.0)
            .or_default()
            .insert(slot.1, target);
    }

    fn ensure_known(&self, id: &TargetId) -> ServiceRegistryResult<()> {
        if self.id_index.contains_key(id) {
            Ok(())
        } else {
            Err(ServiceRegistryError::UnknownTarget(id.clone()))
        }
    }
}

impl InMemoryServiceRegistry {
    /// Creates an empty in-memory registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ServiceRegistryResult<RwLockReadGuard<'_, InMemoryRegistryState>> {
        self.state.read().map_err(|err| {
            ServiceRegistryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> ServiceRegistryResult<RwLockWriteGuard<'_, InMemoryRegistryState>> {
        self.state.write().map_err(|err| {
            ServiceRegistryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl ServiceRegistry for InMemoryServiceRegistry {
    async fn register(&self, target: &ServiceTarget) -> ServiceRegistryResult<()> {
        self.write()?.insert(target.clone());
        Ok(())
    }

    async fn deregister(&self, target: &ServiceTarget) -> ServiceRegistryResult<bool> {
        let mut state = self.write()?;
        let removed = state
            .entries
            .get_mut(&target.category())
            .and_then(|category| category.remove(target.capability_type()));
        let Some(removed_target) = removed else {
            return Ok(false);
        };
        if let Some(id) = removed_target.id() {
            state.forget_id(id);
        }
        Ok(true)
    }

    async fn get_service(
        &self,
        capability_type: &CapabilityType,
        category: ServiceCategory,
    ) -> ServiceRegistryResult<Option<ServiceTarget>> {
        let state = self.read()?;
        Ok(state.slot(&(category, capability_type.clone())).cloned())
    }

    async fn get_entries(
        &self,
        category: ServiceCategory,
    ) -> ServiceRegistryResult<Vec<ServiceTarget>> {
        let state = self.read()?;
        Ok(state
            .entries
            .get(&category)
            .map(|targets| targets.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn update(&self, target: &ServiceTarget) -> ServiceRegistryResult<ServiceTarget> {
        let mut state = self.write()?;
        let slot = (target.category(), target.capability_type().clone());
        let stored = state
            .slot(&slot)
            .ok_or_else(|| ServiceRegistryError::not_found(&slot.1, slot.0))?;

        let mut replacement = ServiceTarget::new(
            target.capability_type().clone(),
            target.address().clone(),
            target.category(),
        )
        .with_configurations(target.configurations().clone());
        if let Some(id) = stored.id() {
            replacement.assign_id(id.clone());
        }
        state.insert(replacement.clone());
        Ok(replacement)
    }

    async fn update_option(
        &self,
        capability_type: &CapabilityType,
        option: &str,
        value: &str,
    ) -> ServiceRegistryResult<Vec<ServiceTarget>> {
        let mut state = self.write()?;
        let updated: Vec<ServiceTarget> = state
            .entries
            .values_mut()
            .filter_map(|category| category.get_mut(capability_type))
            .map(|target| {
                target.set_configuration(option, value);
                target.clone()
            })
            .collect();
        if updated.is_empty() {
            return Err(ServiceRegistryError::NotFound {
                capability_type: capability_type.clone(),
                category: "any".to_owned(),
            });
        }
        Ok(updated)
    }

    async fn find_by_id(&self, id: &TargetId) -> ServiceRegistryResult<Option<ServiceTarget>> {
        let state = self.read()?;
        Ok(state
            .id_index
            .get(id)
            .and_then(|slot| state.slot(slot))
            .cloned())
    }

    async fn record_ping(&self, id: &TargetId, at: DateTime<Utc>) -> ServiceRegistryResult<()> {
        let mut state = self.write()?;
        state.ensure_known(id)?;
        state
            .health
            .entry(id.clone())
            .and_modify(|health| health.touch(at))
            .or_insert_with(|| TargetHealth::seen_at(at));
        Ok(())
    }

    async fn record_health(
        &self,
        id: &TargetId,
        health_state: HealthState,
    ) -> ServiceRegistryResult<()> {
        let mut state = self.write()?;
        state.ensure_known(id)?;
        let timestamp = health_state.timestamp();
        state
            .health
            .entry(id.clone())
            .or_insert_with(|| TargetHealth::seen_at(timestamp))
            .record(health_state);
        Ok(())
    }

    async fn health(&self, id: &TargetId) -> ServiceRegistryResult<Option<TargetHealth>> {
        let state = self.read()?;
        Ok(state.health.get(id).cloned())
    }

    async fn silent_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> ServiceRegistryResult<Vec<ServiceTarget>> {
        let state = self.read()?;
        // Targets never seen count as silent; id-less entries cannot be pinged
        // and are left out.
        Ok(state
            .entries
            .values()
            .flat_map(BTreeMap::values)
            .filter(|target| {
                target.id().is_some_and(|id| {
                    state
                        .health
                        .get(id)
                        .is_none_or(|health| health.last_seen() < cutoff)
                })
            })
            .cloned()
            .collect())
    }
}
