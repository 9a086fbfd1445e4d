//! Service layer for target registration and resolution.
//!
//! [`TargetRegistryService`] is the router-side handler of the registration
//! protocol. [`ServiceResolver`] is the read path every proxied call passes
//! through.

mod resolver;
mod targets;

pub use resolver::{ResolveError, ServiceResolver};
pub use targets::{TargetRegistryService, TargetRegistryServiceError, TargetRegistryServiceResult};
