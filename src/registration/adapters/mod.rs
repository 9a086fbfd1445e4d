//! Adapter implementations for discovery and identity ports.

mod file;
mod http;
mod local;
mod memory;

pub use file::FileIdentityStore;
pub use http::HttpDiscoveryClient;
pub use local::LocalDiscoveryClient;
pub use memory::InMemoryIdentityStore;
