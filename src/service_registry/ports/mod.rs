//! Port contracts for the service registry.

mod registry;

pub use registry::{ServiceRegistry, ServiceRegistryError, ServiceRegistryResult};
