//! Registration lifecycle orchestration.

mod manager;

pub use manager::RegistrationManager;
