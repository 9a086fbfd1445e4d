//! Registration lifecycle states.

use std::fmt;

/// Where a provider is in its registration lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationState {
    /// Not registered; the next `register` call will try.
    Unregistered,
    /// An attempt is in flight.
    Registering,
    /// The router holds the registration.
    Registered,
    /// An attempt failed and the next one is waiting out its pause.
    FailedPendingRetry,
}

impl RegistrationState {
    /// Returns the canonical log representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unregistered => "unregistered",
            Self::Registering => "registering",
            Self::Registered => "registered",
            Self::FailedPendingRetry => "failed_pending_retry",
        }
    }
}

impl fmt::Display for RegistrationState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
