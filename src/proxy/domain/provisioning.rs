//! Provisioning exchange types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a provisioning payload should be interpreted by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadType {
    /// The payload is the material itself.
    Builtin,
    /// The payload points at material stored elsewhere.
    Reference,
}

/// Opaque configuration blob pushed to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Payload interpretation.
    pub payload_type: PayloadType,
    /// Name of the tool or resource being provisioned.
    pub name: String,
    /// Raw payload; never absent, empty when the caller supplied nothing.
    pub payload: String,
}

/// Opaque secret blob pushed to a provider.
///
/// The router forwards secrets without interpreting them, so `Debug`
/// redacts the payload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    /// Payload interpretation.
    pub payload_type: PayloadType,
    /// Name of the tool or resource being provisioned.
    pub name: String,
    /// Raw payload; never absent, empty when the caller supplied nothing.
    pub payload: String,
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Secret")
            .field("payload_type", &self.payload_type)
            .field("name", &self.name)
            .field("payload", &"<redacted>")
            .finish()
    }
}

/// Provisioning request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionRequest {
    /// Configuration material.
    pub configuration: Configuration,
    /// Secret material.
    pub secret: Secret,
}

/// Schema of one property a provisioned capability accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// Property type name, such as `string`.
    #[serde(rename = "type")]
    pub property_type: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Whether callers must supply the property.
    #[serde(default)]
    pub required: bool,
}

/// URIs returned by a successful provisioning exchange.
///
/// Callers cache these and attach them to later invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningReference {
    /// Where the provider stored the configuration.
    pub configuration_uri: String,
    /// Where the provider stored the secrets.
    pub secrets_uri: String,
    /// Properties the provisioned capability accepts.
    #[serde(default)]
    pub property_schema: BTreeMap<String, PropertySchema>,
}
