//! Error types for service target validation and parsing.

use thiserror::Error;

/// Errors returned while constructing service registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryDomainError {
    /// The capability type is empty after trimming.
    #[error("capability type must not be empty")]
    EmptyCapabilityType,

    /// The capability type contains characters outside `[A-Za-z0-9_.-]` or
    /// starts with a dot.
    #[error(
        "capability type '{0}' is invalid (only ASCII alphanumerics, '_', '-' and '.' allowed, no leading '.')"
    )]
    InvalidCapabilityType(String),

    /// The target host is empty after trimming.
    #[error("service host must not be empty")]
    EmptyHost,

    /// The address could not be split into host and port.
    #[error("service address '{0}' must have the form host:port")]
    InvalidAddress(String),

    /// The port is not a valid non-zero 16-bit number.
    #[error("service port '{0}' must be a number between 1 and 65535")]
    InvalidPort(String),

    /// A target identifier is empty after trimming.
    #[error("target identifier must not be empty")]
    EmptyTargetId,
}

/// Error returned while parsing a service category.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown service category: {0}")]
pub struct ParseServiceCategoryError(pub String);
