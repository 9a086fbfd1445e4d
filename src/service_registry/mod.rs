//! Router-side service registry and resolution.
//!
//! Capability providers announce themselves as [`domain::ServiceTarget`]
//! values. The registry keeps the authoritative mapping from capability type
//! to network address per category, and the resolver answers the single
//! read question every proxied call asks: which target serves this type
//! right now. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
