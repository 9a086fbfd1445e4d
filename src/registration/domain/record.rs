//! Persisted registration identity.

use crate::service_registry::domain::TargetId;
use serde::{Deserialize, Serialize};

/// Identifier the router assigned to a service, kept across restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    service_name: String,
    assigned_id: TargetId,
}

impl RegistrationRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(service_name: impl Into<String>, assigned_id: TargetId) -> Self {
        Self {
            service_name: service_name.into(),
            assigned_id,
        }
    }

    /// Returns the service name the record belongs to.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the assigned identifier.
    #[must_use]
    pub const fn assigned_id(&self) -> &TargetId {
        &self.assigned_id
    }
}
