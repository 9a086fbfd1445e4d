//! Shared fixtures for in-memory registry tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use switchyard::service_registry::{
    adapters::memory::InMemoryServiceRegistry,
    domain::{CapabilityType, ServiceAddress, ServiceCategory, ServiceTarget},
    services::{ServiceResolver, TargetRegistryService},
};

/// Registration service over the in-memory registry.
pub type TestService = TargetRegistryService<InMemoryServiceRegistry, DefaultClock>;

/// Registration service and resolver sharing one registry.
pub struct Router {
    /// Handles registration traffic.
    pub service: TestService,
    /// Answers resolution queries.
    pub resolver: ServiceResolver<InMemoryServiceRegistry>,
}

/// Provides a router with an empty registry.
#[fixture]
pub fn router() -> Router {
    let registry = Arc::new(InMemoryServiceRegistry::new());
    Router {
        service: TargetRegistryService::new(Arc::clone(&registry), Arc::new(DefaultClock)),
        resolver: ServiceResolver::new(registry),
    }
}

/// Builds an unregistered target.
pub fn target(capability_type: &str, address: &str, category: ServiceCategory) -> ServiceTarget {
    ServiceTarget::new(
        CapabilityType::new(capability_type).expect("valid capability type"),
        ServiceAddress::parse(address).expect("valid address"),
        category,
    )
}

/// Parses a capability type.
pub fn capability(value: &str) -> CapabilityType {
    CapabilityType::new(value).expect("valid capability type")
}
