//! Domain model for the provider registration lifecycle.

mod error;
mod outcome;
mod policy;
mod record;
mod state;

pub use error::RegistrationError;
pub use outcome::RegistrationOutcome;
pub use policy::RetryPolicy;
pub use record::RegistrationRecord;
pub use state::RegistrationState;
