//! Service target aggregate.

use super::{CapabilityType, ServiceAddress, ServiceCategory, TargetId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One capability provider instance as the router knows it.
///
/// A `(capability_type, category)` pair identifies at most one resolvable
/// target at a time. The identifier is absent until the registry assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<TargetId>,
    capability_type: CapabilityType,
    address: ServiceAddress,
    category: ServiceCategory,
    #[serde(default)]
    configurations: BTreeMap<String, String>,
}

impl ServiceTarget {
    /// Creates an unregistered target with no configuration.
    #[must_use]
    pub const fn new(
        capability_type: CapabilityType,
        address: ServiceAddress,
        category: ServiceCategory,
    ) -> Self {
        Self {
            id: None,
            capability_type,
            address,
            category,
            configurations: BTreeMap::new(),
        }
    }

    /// Sets the assigned identifier.
    #[must_use]
    pub fn with_id(mut self, id: TargetId) -> Self {
        self.id = Some(id);
        self
    }

    /// Replaces the advertised configuration map.
    #[must_use]
    pub fn with_configurations(
        mut self,
        configurations: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.configurations = configurations.into_iter().collect();
        self
    }

    /// Adds or replaces one configuration option.
    #[must_use]
    pub fn with_configuration(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_configuration(key, value);
        self
    }

    /// Returns the assigned identifier, if any.
    #[must_use]
    pub const fn id(&self) -> Option<&TargetId> {
        self.id.as_ref()
    }

    /// Returns the capability type served.
    #[must_use]
    pub const fn capability_type(&self) -> &CapabilityType {
        &self.capability_type
    }

    /// Returns the network address.
    #[must_use]
    pub const fn address(&self) -> &ServiceAddress {
        &self.address
    }

    /// Returns the category served under.
    #[must_use]
    pub const fn category(&self) -> ServiceCategory {
        self.category
    }

    /// Returns the advertised configuration map.
    #[must_use]
    pub const fn configurations(&self) -> &BTreeMap<String, String> {
        &self.configurations
    }

    /// Assigns or replaces the identifier in place.
    pub fn assign_id(&mut self, id: TargetId) {
        self.id = Some(id);
    }

    /// Sets one configuration option in place.
    pub fn set_configuration(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.configurations.insert(key.into(), value.into());
    }

    /// Returns whether `other` occupies the same registry slot.
    #[must_use]
    pub fn same_slot(&self, other: &Self) -> bool {
        self.category == other.category && self.capability_type == other.capability_type
    }
}
