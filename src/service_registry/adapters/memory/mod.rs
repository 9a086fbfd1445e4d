//! In-memory service registry.

mod registry;

pub use registry::InMemoryServiceRegistry;
