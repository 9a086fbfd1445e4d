//! Resource acquisition proxy.

use super::ProxyResult;
use super::shared::ProxyCore;
use crate::proxy::{
    domain::{
        InquireReply, ProvisioningReference, ResourceArguments, ResourceContents,
        ResourcePayload, ResourceReference, ResourceReply, ResourceRequest,
    },
    ports::ProxyTransport,
};
use crate::service_registry::{
    domain::{CapabilityType, ServiceCategory},
    ports::ServiceRegistry,
    services::ServiceResolver,
};
use std::sync::Arc;

const ERROR_MIME_TYPE: &str = "text/plain";
const GENERIC_FAILURE: &str = "resource acquisition failed";

/// Routes resource reads to resource providers.
pub struct ResourceAcquirerProxy<R, T>
where
    R: ServiceRegistry,
{
    core: ProxyCore<R, T, ResourceRequest, ResourceReply>,
}

impl<R, T> ResourceAcquirerProxy<R, T>
where
    R: ServiceRegistry,
    T: ProxyTransport<ResourceRequest, ResourceReply>,
{
    /// Creates a resource acquirer proxy.
    #[must_use]
    pub const fn new(resolver: ServiceResolver<R>, transport: Arc<T>) -> Self {
        Self {
            core: ProxyCore::new(resolver, transport, ServiceCategory::ResourceProvider),
        }
    }

    /// Reads a resource from the provider currently serving its capability
    /// type.
    ///
    /// Each reply content item keeps the reference's MIME type. A reply
    /// flagged as an error becomes a single `text/plain` item carrying its
    /// first content item.
    ///
    /// # Errors
    ///
    /// Returns [`super::ProxyError::NotFound`] when no provider serves the
    /// type and [`super::ProxyError::ServiceUnavailable`] when the transport
    /// fails.
    pub async fn call(
        &self,
        reference: &ResourceReference,
        arguments: &ResourceArguments,
    ) -> ProxyResult<Vec<ResourceContents>> {
        let target = self.core.resolve(&reference.capability_type).await?;
        let request = ResourceRequest {
            location: reference.location.clone(),
            capability_type: reference.capability_type.to_string(),
            name: reference.name.clone(),
            configuration_uri: reference.configuration_uri.clone().unwrap_or_default(),
            secrets_uri: reference.secrets_uri.clone().unwrap_or_default(),
        };
        let reply = self.core.send(request, &target).await?;
        Ok(interpret_reply(reply, reference, &arguments.request_uri))
    }

    /// Pushes configuration and secrets for a resource to its provider.
    ///
    /// # Errors
    ///
    /// Returns [`super::ProxyError`] like [`ResourceAcquirerProxy::call`].
    pub async fn provision(&self, payload: &ResourcePayload) -> ProxyResult<ProvisioningReference> {
        self.core
            .provision_resource(
                &payload.reference.capability_type,
                &payload.reference.name,
                payload.configuration_data.as_deref(),
                payload.secrets_data.as_deref(),
            )
            .await
    }

    /// Asks the provider of `capability_type` which configuration keys it
    /// understands.
    ///
    /// # Errors
    ///
    /// Returns [`super::ProxyError`] like [`ResourceAcquirerProxy::call`].
    pub async fn service_configurations(
        &self,
        capability_type: &CapabilityType,
    ) -> ProxyResult<InquireReply> {
        self.core.inquire(capability_type).await
    }
}

fn interpret_reply(
    reply: ResourceReply,
    reference: &ResourceReference,
    request_uri: &str,
) -> Vec<ResourceContents> {
    if reply.is_error {
        let message = reply
            .content
            .into_iter()
            .next()
            .unwrap_or_else(|| GENERIC_FAILURE.to_owned());
        return vec![ResourceContents::new(request_uri, message, ERROR_MIME_TYPE)];
    }
    reply
        .content
        .into_iter()
        .map(|line| ResourceContents::new(request_uri, line, reference.mime_type.as_str()))
        .collect()
}
