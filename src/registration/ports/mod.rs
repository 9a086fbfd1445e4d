//! Port contracts for the provider registration lifecycle.

mod discovery;
mod identity;

#[cfg(test)]
pub use discovery::MockDiscoveryClient;
pub use discovery::{DiscoveryClient, DiscoveryError, DiscoveryResult};
#[cfg(test)]
pub use identity::MockIdentityStore;
pub use identity::{IdentityStore, IdentityStoreError, IdentityStoreResult};
