//! Opaque capability type key.

use super::RegistryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// String key selecting among capability providers (for example `s3` or
/// `http`).
///
/// Capability types are deliberately open: any provider can introduce a new
/// one without the router knowing about it in advance. Validation only keeps
/// the value usable as a map key and as a file name on the provider side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CapabilityType(String);

impl CapabilityType {
    /// Creates a validated capability type.
    ///
    /// The input is trimmed. Only characters in `[A-Za-z0-9_.-]` are accepted
    /// and the value must not start with `.`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::EmptyCapabilityType`] when the value is
    /// empty after trimming, or
    /// [`RegistryDomainError::InvalidCapabilityType`] when it contains
    /// disallowed characters.
    pub fn new(value: impl Into<String>) -> Result<Self, RegistryDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(RegistryDomainError::EmptyCapabilityType);
        }

        let is_valid = !normalized.starts_with('.')
            && normalized.chars().all(|character| {
                character.is_ascii_alphanumeric() || matches!(character, '_' | '-' | '.')
            });
        if !is_valid {
            return Err(RegistryDomainError::InvalidCapabilityType(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the capability type as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CapabilityType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CapabilityType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl TryFrom<String> for CapabilityType {
    type Error = RegistryDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CapabilityType> for String {
    fn from(value: CapabilityType) -> Self {
        value.0
    }
}
