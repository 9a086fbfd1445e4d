//! Frame envelopes of the capability protocol.

use crate::proxy::domain::{
    InquireReply, ProvisionRequest, ProvisioningReference, ResourceReply, ResourceRequest,
    ToolInvokeReply, ToolInvokeRequest,
};
use serde::{Deserialize, Serialize};

/// Frame sent from the router to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum WireRequest {
    /// Tool invocation.
    Invoke(ToolInvokeRequest),
    /// Resource read.
    Acquire(ResourceRequest),
    /// Provisioning exchange.
    Provision(ProvisionRequest),
    /// Configuration key inquiry.
    Inquire,
}

impl WireRequest {
    /// Returns the frame kind as it appears on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Invoke(_) => "invoke",
            Self::Acquire(_) => "acquire",
            Self::Provision(_) => "provision",
            Self::Inquire => "inquire",
        }
    }
}

/// Frame sent from a provider back to the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum WireReply {
    /// Tool invocation reply.
    Invoke(ToolInvokeReply),
    /// Resource read reply.
    Acquire(ResourceReply),
    /// Provisioning result.
    Provision(ProvisioningReference),
    /// Configuration keys.
    Inquire(InquireReply),
    /// The provider could not process the request frame.
    Fault {
        /// Description of the problem.
        message: String,
    },
}

impl WireReply {
    /// Returns the frame kind as it appears on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Invoke(_) => "invoke",
            Self::Acquire(_) => "acquire",
            Self::Provision(_) => "provision",
            Self::Inquire(_) => "inquire",
            Self::Fault { .. } => "fault",
        }
    }
}

/// Request type that travels as a [`WireRequest`] and expects a matching
/// [`WireReply`].
pub trait WireExchange: Send + 'static {
    /// Reply type extracted from the reply frame.
    type Reply: Send + 'static;

    /// Wraps the request in its frame.
    fn into_frame(self) -> WireRequest;

    /// Extracts the reply, describing the mismatch otherwise.
    ///
    /// # Errors
    ///
    /// Returns a message when the frame is a fault or of another kind.
    fn from_frame(reply: WireReply) -> Result<Self::Reply, String>;
}

pub(crate) fn unexpected(expected: &str, reply: &WireReply) -> String {
    match reply {
        WireReply::Fault { message } => format!("provider fault: {message}"),
        other => format!("expected {expected} reply, got {}", other.kind()),
    }
}

impl WireExchange for ToolInvokeRequest {
    type Reply = ToolInvokeReply;

    fn into_frame(self) -> WireRequest {
        WireRequest::Invoke(self)
    }

    fn from_frame(reply: WireReply) -> Result<Self::Reply, String> {
        match reply {
            WireReply::Invoke(body) => Ok(body),
            other => Err(unexpected("invoke", &other)),
        }
    }
}

impl WireExchange for ResourceRequest {
    type Reply = ResourceReply;

    fn into_frame(self) -> WireRequest {
        WireRequest::Acquire(self)
    }

    fn from_frame(reply: WireReply) -> Result<Self::Reply, String> {
        match reply {
            WireReply::Acquire(body) => Ok(body),
            other => Err(unexpected("acquire", &other)),
        }
    }
}

impl WireExchange for ProvisionRequest {
    type Reply = ProvisioningReference;

    fn into_frame(self) -> WireRequest {
        WireRequest::Provision(self)
    }

    fn from_frame(reply: WireReply) -> Result<Self::Reply, String> {
        match reply {
            WireReply::Provision(body) => Ok(body),
            other => Err(unexpected("provision", &other)),
        }
    }
}
