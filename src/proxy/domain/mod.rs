//! Messages exchanged with capability providers.
//!
//! References describe what a caller wants (a tool or resource plus any
//! provisioned URIs), requests and replies are what travels to and from the
//! provider, and responses are what the caller gets back.

mod messages;
mod provisioning;
mod references;
mod response;

pub use messages::{
    InquireReply, ResourceReply, ResourceRequest, ToolArguments, ToolInvokeReply,
    ToolInvokeRequest,
};
pub use provisioning::{
    Configuration, PayloadType, PropertySchema, ProvisionRequest, ProvisioningReference, Secret,
};
pub use references::{
    BODY_ARGUMENT, ResourceArguments, ResourcePayload, ResourceReference, ToolPayload,
    ToolReference,
};
pub use response::{ResourceContents, ToolResponse};
