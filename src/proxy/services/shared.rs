//! Resolve, send and provision steps shared by both proxies.

use super::ProxyResult;
use crate::proxy::{
    domain::{Configuration, InquireReply, PayloadType, ProvisioningReference, Secret},
    ports::ProxyTransport,
};
use crate::service_registry::{
    domain::{CapabilityType, ServiceCategory, ServiceTarget},
    ports::ServiceRegistry,
    services::ServiceResolver,
};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

pub(super) struct ProxyCore<R, T, Req, Resp>
where
    R: ServiceRegistry,
{
    resolver: ServiceResolver<R>,
    transport: Arc<T>,
    category: ServiceCategory,
    exchange: PhantomData<fn(Req) -> Resp>,
}

impl<R, T, Req, Resp> ProxyCore<R, T, Req, Resp>
where
    R: ServiceRegistry,
    T: ProxyTransport<Req, Resp>,
    Req: Send + 'static,
    Resp: Send + 'static,
{
    pub(super) const fn new(
        resolver: ServiceResolver<R>,
        transport: Arc<T>,
        category: ServiceCategory,
    ) -> Self {
        Self {
            resolver,
            transport,
            category,
            exchange: PhantomData,
        }
    }

    pub(super) async fn resolve(
        &self,
        capability_type: &CapabilityType,
    ) -> ProxyResult<ServiceTarget> {
        Ok(self.resolver.resolve(capability_type, self.category).await?)
    }

    pub(super) async fn send(&self, request: Req, target: &ServiceTarget) -> ProxyResult<Resp> {
        debug!(
            transport = self.transport.name(),
            address = %target.address(),
            capability_type = %target.capability_type(),
            "sending request"
        );
        Ok(self.transport.send(request, target).await?)
    }

    /// Provisions `name` on the provider of `capability_type`. Absent data
    /// is sent as an empty string.
    pub(super) async fn provision_resource(
        &self,
        capability_type: &CapabilityType,
        name: &str,
        configuration_data: Option<&str>,
        secrets_data: Option<&str>,
    ) -> ProxyResult<ProvisioningReference> {
        let target = self.resolve(capability_type).await?;
        let configuration = Configuration {
            payload_type: PayloadType::Builtin,
            name: name.to_owned(),
            payload: configuration_data.unwrap_or_default().to_owned(),
        };
        let secret = Secret {
            payload_type: PayloadType::Builtin,
            name: name.to_owned(),
            payload: secrets_data.unwrap_or_default().to_owned(),
        };
        debug!(
            address = %target.address(),
            %capability_type,
            name,
            "provisioning capability"
        );
        Ok(self
            .transport
            .provision(configuration, secret, &target)
            .await?)
    }

    pub(super) async fn inquire(
        &self,
        capability_type: &CapabilityType,
    ) -> ProxyResult<InquireReply> {
        let target = self.resolve(capability_type).await?;
        Ok(self.transport.inquire(&target).await?)
    }
}
