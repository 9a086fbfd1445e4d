//! Tool invocation proxy.

use super::shared::ProxyCore;
use super::{ProxyError, ProxyResult};
use crate::proxy::{
    domain::{
        BODY_ARGUMENT, InquireReply, ProvisioningReference, ToolArguments, ToolInvokeReply,
        ToolInvokeRequest, ToolPayload, ToolReference, ToolResponse,
    },
    ports::ProxyTransport,
};
use crate::service_registry::{
    domain::{CapabilityType, ServiceCategory, ServiceTarget},
    ports::ServiceRegistry,
    services::ServiceResolver,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

const GENERIC_FAILURE: &str = "tool invocation failed";

/// Routes tool invocations to tool invoker providers.
pub struct InvokerProxy<R, T>
where
    R: ServiceRegistry,
{
    core: ProxyCore<R, T, ToolInvokeRequest, ToolInvokeReply>,
}

impl<R, T> InvokerProxy<R, T>
where
    R: ServiceRegistry,
    T: ProxyTransport<ToolInvokeRequest, ToolInvokeReply>,
{
    /// Creates an invoker proxy.
    #[must_use]
    pub const fn new(resolver: ServiceResolver<R>, transport: Arc<T>) -> Self {
        Self {
            core: ProxyCore::new(resolver, transport, ServiceCategory::ToolInvoker),
        }
    }

    /// Invokes a tool on the provider currently serving its capability type.
    ///
    /// The `body` argument becomes the raw request body; every other
    /// argument is sent as text (strings verbatim, other JSON values
    /// serialized). A reply flagged as an error becomes a failed
    /// [`ToolResponse`] carrying its first content item.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::NotFound`] when no provider serves the type and
    /// [`ProxyError::ServiceUnavailable`] when the transport fails.
    pub async fn call(
        &self,
        reference: &ToolReference,
        arguments: &ToolArguments,
    ) -> ProxyResult<ToolResponse> {
        let target = self.core.resolve(&reference.capability_type).await?;
        let request = build_request(reference, arguments, &target);
        let reply = self.core.send(request, &target).await?;
        Ok(interpret_reply(reply))
    }

    /// Invokes a tool and folds every failure into a failed
    /// [`ToolResponse`], so one broken provider never fails the caller.
    pub async fn execute(
        &self,
        reference: &ToolReference,
        arguments: &ToolArguments,
    ) -> ToolResponse {
        match self.call(reference, arguments).await {
            Ok(response) => response,
            Err(err) => {
                warn!(tool = %reference.name, error = %err, "tool invocation failed");
                ToolResponse::failure(err.to_string())
            }
        }
    }

    /// Pushes configuration and secrets for a tool to its provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::NotFound`] when no provider serves the type and
    /// [`ProxyError::ServiceUnavailable`] when the transport fails.
    pub async fn provision(&self, payload: &ToolPayload) -> ProxyResult<ProvisioningReference> {
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
    /// Returns [`ProxyError`] like [`InvokerProxy::call`].
    pub async fn service_configurations(
        &self,
        capability_type: &CapabilityType,
    ) -> Result<InquireReply, ProxyError> {
        self.core.inquire(capability_type).await
    }
}

fn argument_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn build_request(
    reference: &ToolReference,
    arguments: &ToolArguments,
    target: &ServiceTarget,
) -> ToolInvokeRequest {
    let body = arguments
        .get(BODY_ARGUMENT)
        .map(argument_text)
        .unwrap_or_default();
    let rendered: BTreeMap<String, String> = arguments
        .iter()
        .filter(|(name, _)| name.as_str() != BODY_ARGUMENT)
        .map(|(name, value)| (name.clone(), argument_text(value)))
        .collect();
    ToolInvokeRequest {
        uri: reference.uri.clone(),
        body,
        arguments: rendered,
        service_configurations: target.configurations().clone(),
        configuration_uri: reference.configuration_uri.clone().unwrap_or_default(),
        secrets_uri: reference.secrets_uri.clone().unwrap_or_default(),
    }
}

fn interpret_reply(reply: ToolInvokeReply) -> ToolResponse {
    if reply.is_error {
        let message = reply
            .content
            .into_iter()
            .next()
            .unwrap_or_else(|| GENERIC_FAILURE.to_owned());
        return ToolResponse::failure(message);
    }
    ToolResponse::success(reply.content)
}
