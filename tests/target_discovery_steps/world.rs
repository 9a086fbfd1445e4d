//! Shared world state for target discovery BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use switchyard::service_registry::{
    adapters::memory::InMemoryServiceRegistry,
    domain::{CapabilityType, ServiceAddress, ServiceCategory, ServiceTarget},
    services::{ServiceResolver, TargetRegistryService},
};

/// Service type used by the BDD world.
pub type TestRegistryService = TargetRegistryService<InMemoryServiceRegistry, DefaultClock>;

/// Scenario world for target discovery behaviour tests.
pub struct DiscoveryWorld {
    /// Registration service under test.
    pub service: TestRegistryService,
    /// Resolver sharing the service's registry.
    pub resolver: ServiceResolver<InMemoryServiceRegistry>,
    /// Targets as returned by their registration.
    pub registered: Vec<ServiceTarget>,
}

impl DiscoveryWorld {
    /// Creates a world around an empty registry.
    #[must_use]
    pub fn new() -> Self {
        let registry = Arc::new(InMemoryServiceRegistry::new());
        Self {
            service: TargetRegistryService::new(Arc::clone(&registry), Arc::new(DefaultClock)),
            resolver: ServiceResolver::new(registry),
            registered: Vec::new(),
        }
    }

    /// Registers a target and remembers the stored version.
    pub fn register(&mut self, target: ServiceTarget) -> Result<(), eyre::Report> {
        let stored = run_async(self.service.register(target))
            .map_err(|err| eyre::eyre!("registration failed: {err}"))?;
        self.registered.push(stored);
        Ok(())
    }
}

impl Default for DiscoveryWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DiscoveryWorld {
    DiscoveryWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a category name as written in feature files.
pub fn category(name: &str) -> Result<ServiceCategory, eyre::Report> {
    ServiceCategory::try_from(name).map_err(|err| eyre::eyre!("bad category '{name}': {err}"))
}

/// Parses a capability type as written in feature files.
pub fn capability(name: &str) -> Result<CapabilityType, eyre::Report> {
    CapabilityType::new(name).map_err(|err| eyre::eyre!("bad capability type '{name}': {err}"))
}

/// Builds an unregistered target from feature file values.
pub fn build_target(
    capability_type: &str,
    address: &str,
    category_name: &str,
) -> Result<ServiceTarget, eyre::Report> {
    let parsed_address = ServiceAddress::parse(address)
        .map_err(|err| eyre::eyre!("bad address '{address}': {err}"))?;
    Ok(ServiceTarget::new(
        capability(capability_type)?,
        parsed_address,
        category(category_name)?,
    ))
}
