//! Provider-side registration lifecycle.
//!
//! A capability provider announces its [`ServiceTarget`] to the router,
//! keeps the identifier the router assigns across restarts, and reports
//! liveness and health afterwards. Registration retries within a call are
//! bounded; an external driver (see
//! [`services::RegistrationManager::spawn_heartbeat`]) keeps calling
//! `register` so retries across calls are not.
//!
//! [`ServiceTarget`]: crate::service_registry::domain::ServiceTarget

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
