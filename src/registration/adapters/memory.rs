//! In-memory identity store for tests and ephemeral providers.

use crate::registration::{
    domain::RegistrationRecord,
    ports::{IdentityStore, IdentityStoreResult},
};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Identity store that forgets everything when dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityStore {
    records: Arc<RwLock<HashMap<String, RegistrationRecord>>>,
}

impl InMemoryIdentityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `record`, as after a restart.
    #[must_use]
    pub fn with_record(record: RegistrationRecord) -> Self {
        let store = Self::new();
        store
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.service_name().to_owned(), record);
        store
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn prepare(&self) -> IdentityStoreResult<()> {
        Ok(())
    }

    fn load(&self, service_name: &str) -> IdentityStoreResult<Option<RegistrationRecord>> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(service_name)
            .cloned())
    }

    fn save(&self, record: &RegistrationRecord) -> IdentityStoreResult<()> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.service_name().to_owned(), record.clone());
        Ok(())
    }
}
