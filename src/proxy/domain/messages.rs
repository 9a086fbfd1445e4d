//! Request and reply bodies of the capability protocol.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Caller-supplied tool arguments, keyed by name.
pub type ToolArguments = BTreeMap<String, serde_json::Value>;

/// Tool invocation sent to a tool invoker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvokeRequest {
    /// Tool URI as published in tool metadata.
    pub uri: String,
    /// Raw request body, extracted from the `body` argument.
    #[serde(default)]
    pub body: String,
    /// Remaining arguments rendered as text.
    #[serde(default)]
    pub arguments: BTreeMap<String, String>,
    /// Configuration the provider advertised when it registered.
    #[serde(default)]
    pub service_configurations: BTreeMap<String, String>,
    /// Provisioned configuration URI, empty when never provisioned.
    #[serde(default)]
    pub configuration_uri: String,
    /// Provisioned secrets URI, empty when never provisioned.
    #[serde(default)]
    pub secrets_uri: String,
}

/// Tool invoker reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvokeReply {
    /// Whether the tool reported a failure.
    pub is_error: bool,
    /// Content items; the first item carries the message on failure.
    #[serde(default)]
    pub content: Vec<String>,
}

/// Resource read sent to a resource provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequest {
    /// Provider-specific location of the resource.
    pub location: String,
    /// Capability type serving the read.
    pub capability_type: String,
    /// Resource name.
    pub name: String,
    /// Provisioned configuration URI, empty when never provisioned.
    #[serde(default)]
    pub configuration_uri: String,
    /// Provisioned secrets URI, empty when never provisioned.
    #[serde(default)]
    pub secrets_uri: String,
}

/// Resource provider reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceReply {
    /// Whether the read failed.
    pub is_error: bool,
    /// Content items; the first item carries the message on failure.
    #[serde(default)]
    pub content: Vec<String>,
}

/// Configuration keys a provider understands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquireReply {
    /// Names of service configuration options.
    #[serde(default)]
    pub service_configurations: Vec<String>,
    /// Names of credential options.
    #[serde(default)]
    pub credentials_configurations: Vec<String>,
}
