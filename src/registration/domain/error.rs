//! Fatal registration errors.

use crate::registration::ports::IdentityStoreError;
use thiserror::Error;

/// Errors that stop a provider from starting its registration lifecycle.
///
/// Everything after construction is logged and retried instead.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The identity store location could not be created.
    #[error("cannot prepare registration identity location: {0}")]
    IdentityLocation(#[source] IdentityStoreError),
}
