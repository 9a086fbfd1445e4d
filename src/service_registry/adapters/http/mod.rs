//! HTTP adapter exposing the registration protocol.
//!
//! Providers reach the router through these routes; the provider-side
//! discovery client in [`crate::registration`] speaks the same envelope.

mod envelope;
mod routes;

pub use envelope::ApiResponse;
pub use routes::{TARGETS_PATH, registration_routes};
