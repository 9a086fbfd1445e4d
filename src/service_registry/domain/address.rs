//! Network address of a capability provider.

use super::RegistryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Host and port a provider listens on, rendered as `host:port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceAddress {
    host: String,
    port: u16,
}

impl ServiceAddress {
    /// Creates an address from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::EmptyHost`] when the host is blank, or
    /// [`RegistryDomainError::InvalidPort`] when the port is zero.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, RegistryDomainError> {
        let normalized = host.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(RegistryDomainError::EmptyHost);
        }
        if port == 0 {
            return Err(RegistryDomainError::InvalidPort(port.to_string()));
        }
        Ok(Self {
            host: normalized,
            port,
        })
    }

    /// Parses a `host:port` string.
    ///
    /// The split happens on the last colon so bracketed IPv6 hosts such as
    /// `[::1]:9000` keep their inner colons.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::InvalidAddress`] when no port separator
    /// exists, or the errors of [`ServiceAddress::new`].
    pub fn parse(value: &str) -> Result<Self, RegistryDomainError> {
        let (host, port) = value
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| RegistryDomainError::InvalidAddress(value.to_owned()))?;
        let parsed_port = port
            .parse::<u16>()
            .map_err(|_| RegistryDomainError::InvalidPort(port.to_owned()))?;
        Self::new(host, parsed_port)
    }

    /// Returns the host name or IP literal.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ServiceAddress {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.host, self.port)
    }
}

impl TryFrom<String> for ServiceAddress {
    type Error = RegistryDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ServiceAddress> for String {
    fn from(value: ServiceAddress) -> Self {
        value.to_string()
    }
}
