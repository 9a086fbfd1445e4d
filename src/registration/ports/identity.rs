//! Identity port: local persistence of the assigned registration id.

use crate::registration::domain::RegistrationRecord;
use std::sync::Arc;
use thiserror::Error;

/// Result type for identity store operations.
pub type IdentityStoreResult<T> = Result<T, IdentityStoreError>;

/// Local store of [`RegistrationRecord`] values keyed by service name.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityStore: Send + Sync {
    /// Creates the storage location if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Io`] when the location cannot be
    /// created.
    fn prepare(&self) -> IdentityStoreResult<()>;

    /// Loads the record for `service_name`, if one was saved.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Corrupt`] for unreadable records.
    fn load(&self, service_name: &str) -> IdentityStoreResult<Option<RegistrationRecord>>;

    /// Saves a record, replacing any previous one for its service.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Io`] when the write fails.
    fn save(&self, record: &RegistrationRecord) -> IdentityStoreResult<()>;
}

/// Errors returned by identity stores.
#[derive(Debug, Clone, Error)]
pub enum IdentityStoreError {
    /// Storage access failed.
    #[error("identity storage error: {0}")]
    Io(Arc<std::io::Error>),

    /// A stored record could not be decoded.
    #[error("corrupt registration record for {service_name}: {message}")]
    Corrupt {
        /// Service whose record is corrupt.
        service_name: String,
        /// Decoder message.
        message: String,
    },
}

impl From<std::io::Error> for IdentityStoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
