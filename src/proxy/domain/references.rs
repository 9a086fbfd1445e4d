//! Caller-side descriptions of tools and resources.

use crate::service_registry::domain::CapabilityType;
use serde::{Deserialize, Serialize};

/// Argument name whose value becomes the raw request body.
pub const BODY_ARGUMENT: &str = "body";

/// Tool metadata needed to route and invoke a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolReference {
    /// Tool name.
    pub name: String,
    /// Capability type of the provider implementing the tool.
    pub capability_type: CapabilityType,
    /// Tool URI passed through to the provider.
    pub uri: String,
    /// Provisioned configuration URI.
    #[serde(default)]
    pub configuration_uri: Option<String>,
    /// Provisioned secrets URI.
    #[serde(default)]
    pub secrets_uri: Option<String>,
}

impl ToolReference {
    /// Creates an unprovisioned tool reference.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        capability_type: CapabilityType,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            capability_type,
            uri: uri.into(),
            configuration_uri: None,
            secrets_uri: None,
        }
    }

    /// Attaches URIs from an earlier provisioning exchange.
    #[must_use]
    pub fn with_provisioning(
        mut self,
        configuration_uri: impl Into<String>,
        secrets_uri: impl Into<String>,
    ) -> Self {
        self.configuration_uri = Some(configuration_uri.into());
        self.secrets_uri = Some(secrets_uri.into());
        self
    }
}

/// Resource metadata needed to route and read a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceReference {
    /// Resource name.
    pub name: String,
    /// Capability type of the provider serving the resource.
    pub capability_type: CapabilityType,
    /// Provider-specific location.
    pub location: String,
    /// MIME type attached to every returned content item.
    pub mime_type: String,
    /// Provisioned configuration URI.
    #[serde(default)]
    pub configuration_uri: Option<String>,
    /// Provisioned secrets URI.
    #[serde(default)]
    pub secrets_uri: Option<String>,
}

impl ResourceReference {
    /// Creates an unprovisioned resource reference.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        capability_type: CapabilityType,
        location: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            capability_type,
            location: location.into(),
            mime_type: mime_type.into(),
            configuration_uri: None,
            secrets_uri: None,
        }
    }

    /// Attaches URIs from an earlier provisioning exchange.
    #[must_use]
    pub fn with_provisioning(
        mut self,
        configuration_uri: impl Into<String>,
        secrets_uri: impl Into<String>,
    ) -> Self {
        self.configuration_uri = Some(configuration_uri.into());
        self.secrets_uri = Some(secrets_uri.into());
        self
    }
}

/// Arguments of a resource read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceArguments {
    /// URI the caller asked for; echoed on every content item.
    pub request_uri: String,
}

/// Raw material to provision a tool with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPayload {
    /// Tool being provisioned.
    pub reference: ToolReference,
    /// Raw configuration, if any.
    #[serde(default)]
    pub configuration_data: Option<String>,
    /// Raw secrets, if any.
    #[serde(default)]
    pub secrets_data: Option<String>,
}

/// Raw material to provision a resource with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePayload {
    /// Resource being provisioned.
    pub reference: ResourceReference,
    /// Raw configuration, if any.
    #[serde(default)]
    pub configuration_data: Option<String>,
    /// Raw secrets, if any.
    #[serde(default)]
    pub secrets_data: Option<String>,
}
