//! Result of one `register` call.

/// What a call to `register` achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The router accepted the registration during this call.
    Registered,
    /// The provider was already registered; a ping was sent instead.
    AlreadyRegistered,
    /// Every attempt failed; the provider stays unregistered.
    Exhausted {
        /// Attempts made.
        attempts: u32,
    },
    /// Another registration held the lock past the wait limit.
    LockUnavailable,
}

impl RegistrationOutcome {
    /// Returns whether the provider is registered after the call.
    #[must_use]
    pub const fn is_registered(self) -> bool {
        matches!(self, Self::Registered | Self::AlreadyRegistered)
    }
}
