//! Discovery client for providers embedded in the router process.

use crate::registration::ports::{DiscoveryClient, DiscoveryError, DiscoveryResult};
use crate::service_registry::{
    domain::{HealthReport, ServiceTarget, TargetId},
    ports::{ServiceRegistry, ServiceRegistryError},
    services::{TargetRegistryService, TargetRegistryServiceError},
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;

/// Calls the router's registration service directly, without HTTP.
pub struct LocalDiscoveryClient<R, C>
where
    R: ServiceRegistry,
    C: Clock + Send + Sync,
{
    service: Arc<TargetRegistryService<R, C>>,
}

impl<R, C> LocalDiscoveryClient<R, C>
where
    R: ServiceRegistry,
    C: Clock + Send + Sync,
{
    /// Creates a client over the router's registration service.
    #[must_use]
    pub const fn new(service: Arc<TargetRegistryService<R, C>>) -> Self {
        Self { service }
    }
}

fn rejected(err: TargetRegistryServiceError) -> DiscoveryError {
    let status = match &err {
        TargetRegistryServiceError::Registry(
            ServiceRegistryError::NotFound { .. } | ServiceRegistryError::UnknownTarget(_),
        ) => 404,
        TargetRegistryServiceError::Registry(ServiceRegistryError::Persistence(_)) => 500,
    };
    DiscoveryError::Status {
        status,
        message: err.to_string(),
    }
}

#[async_trait]
impl<R, C> DiscoveryClient for LocalDiscoveryClient<R, C>
where
    R: ServiceRegistry,
    C: Clock + Send + Sync,
{
    async fn register(&self, target: &ServiceTarget) -> DiscoveryResult<ServiceTarget> {
        self.service.register(target.clone()).await.map_err(rejected)
    }

    async fn deregister(&self, target: &ServiceTarget) -> DiscoveryResult<()> {
        self.service.deregister(target).await.map(|_| ()).map_err(rejected)
    }

    async fn ping(&self, id: &TargetId) -> DiscoveryResult<()> {
        self.service.ping(id).await.map_err(rejected)
    }

    async fn update_state(&self, id: &TargetId, report: &HealthReport) -> DiscoveryResult<()> {
        self.service
            .update_state(id, report.clone())
            .await
            .map_err(rejected)
    }
}
