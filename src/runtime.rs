//! Composition roots for the router and for capability providers.
//!
//! Nothing in the crate is global: a process builds one [`CapabilityRouter`]
//! or one provider [`RegistrationManager`] here and passes the pieces on.

use crate::config::{ConfigError, ProviderSettings, RouterSettings};
use crate::proxy::{
    adapters::wire::FramedTransport,
    services::{InvokerProxy, ResourceAcquirerProxy},
};
use crate::registration::{
    adapters::{FileIdentityStore, HttpDiscoveryClient},
    domain::RegistrationError,
    ports::DiscoveryError,
    services::RegistrationManager,
};
use crate::service_registry::{
    adapters::{http::registration_routes, memory::InMemoryServiceRegistry},
    domain::ServiceTarget,
    services::{ServiceResolver, TargetRegistryService, TargetRegistryServiceResult},
};
use axum::Router;
use mockable::DefaultClock;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

/// Registration service of the router process.
pub type RouterTargets = TargetRegistryService<InMemoryServiceRegistry, DefaultClock>;

/// Tool invocation proxy of the router process.
pub type RouterInvoker = InvokerProxy<InMemoryServiceRegistry, FramedTransport>;

/// Resource acquisition proxy of the router process.
pub type RouterAcquirer = ResourceAcquirerProxy<InMemoryServiceRegistry, FramedTransport>;

/// Registration lifecycle of a provider process.
pub type ProviderRegistration = RegistrationManager<HttpDiscoveryClient, FileIdentityStore>;

/// The router: registry, registration API and both proxies over one
/// shared wire transport.
pub struct CapabilityRouter {
    settings: RouterSettings,
    targets: Arc<RouterTargets>,
    resolver: ServiceResolver<InMemoryServiceRegistry>,
    transport: Arc<FramedTransport>,
    invoker: RouterInvoker,
    acquirer: RouterAcquirer,
}

impl CapabilityRouter {
    /// Builds a router with an empty registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the settings are invalid.
    pub fn new(settings: RouterSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let registry = Arc::new(InMemoryServiceRegistry::new());
        let transport = Arc::new(FramedTransport::tcp(settings.wire_settings()));
        let resolver = ServiceResolver::new(Arc::clone(&registry));
        Ok(Self {
            targets: Arc::new(TargetRegistryService::new(
                Arc::clone(&registry),
                Arc::new(DefaultClock),
            )),
            invoker: InvokerProxy::new(resolver.clone(), Arc::clone(&transport)),
            acquirer: ResourceAcquirerProxy::new(resolver.clone(), Arc::clone(&transport)),
            resolver,
            transport,
            settings,
        })
    }

    /// Returns the settings the router was built with.
    #[must_use]
    pub const fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Returns the registration service.
    #[must_use]
    pub const fn targets(&self) -> &Arc<RouterTargets> {
        &self.targets
    }

    /// Returns the resolver.
    #[must_use]
    pub const fn resolver(&self) -> &ServiceResolver<InMemoryServiceRegistry> {
        &self.resolver
    }

    /// Returns the tool invocation proxy.
    #[must_use]
    pub const fn invoker(&self) -> &RouterInvoker {
        &self.invoker
    }

    /// Returns the resource acquisition proxy.
    #[must_use]
    pub const fn acquirer(&self) -> &RouterAcquirer {
        &self.acquirer
    }

    /// Returns the registration API routes.
    #[must_use]
    pub fn registration_api(&self) -> Router {
        registration_routes(Arc::clone(&self.targets))
    }

    /// Binds the configured registration API address.
    ///
    /// # Errors
    ///
    /// Returns the bind error.
    pub async fn bind(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind(self.settings.bind_address.as_str()).await
    }

    /// Serves the registration API until `shutdown` resolves, then closes
    /// cached provider connections.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from the listener.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let address = listener.local_addr()?;
        info!(%address, "registration API listening");
        axum::serve(listener, self.registration_api())
            .with_graceful_shutdown(shutdown)
            .await?;
        self.shutdown().await;
        Ok(())
    }

    /// Deregisters targets silent for longer than the configured threshold
    /// and closes their cached provider connections.
    ///
    /// # Errors
    ///
    /// Returns registry failures.
    pub async fn evict_stale(&self) -> TargetRegistryServiceResult<Vec<ServiceTarget>> {
        let evicted = self.targets.evict_stale(self.settings.stale_after()).await?;
        for target in &evicted {
            self.transport
                .release(target.category(), target.capability_type())
                .await;
        }
        Ok(evicted)
    }

    /// Closes cached provider connections within the shutdown grace.
    pub async fn shutdown(&self) {
        self.transport.shutdown().await;
        info!("capability router stopped");
    }
}

/// Errors raised while assembling a provider's registration.
#[derive(Debug, Error)]
pub enum ProviderSetupError {
    /// Settings are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The HTTP client could not be built.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    /// The identity location could not be prepared.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

/// Builds the registration lifecycle of a provider: HTTP discovery against
/// the configured router and identity records under the data directory.
///
/// # Errors
///
/// Returns [`ProviderSetupError`] for invalid settings, an unusable HTTP
/// client or an unpreparable data directory.
pub fn provider_registration(
    settings: &ProviderSettings,
) -> Result<ProviderRegistration, ProviderSetupError> {
    settings.validate()?;
    let discovery = HttpDiscoveryClient::new(&settings.router_url, settings.http_timeout())?;
    let identity = FileIdentityStore::new(settings.data_dir.clone());
    Ok(RegistrationManager::new(
        Arc::new(discovery),
        Arc::new(identity),
        settings.target()?,
        settings.retry_policy(),
    )?)
}
