//! Transport that dispatches to handlers living in the same process.

use crate::proxy::{
    adapters::wire::{CapabilityHandler, WireExchange, WireReply, WireRequest, dispatch},
    domain::{Configuration, InquireReply, ProvisionRequest, ProvisioningReference, Secret},
    ports::{ProxyTransport, TransportError, TransportResult},
};
use crate::service_registry::domain::{ServiceAddress, ServiceTarget};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Transport routing frames to handlers mounted at provider addresses.
///
/// Frames go through the same dispatch as the wire server, so reply
/// interpretation matches the TCP transport without any sockets.
#[derive(Default)]
pub struct InProcessTransport {
    handlers: RwLock<HashMap<ServiceAddress, Arc<dyn CapabilityHandler>>>,
    closed: AtomicBool,
}

impl InProcessTransport {
    /// Creates a transport with no mounted handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `address` with `handler`, replacing any previous handler.
    pub fn mount(&self, address: ServiceAddress, handler: Arc<dyn CapabilityHandler>) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address, handler);
    }

    /// Stops serving `address`; later calls see a refused connection.
    pub fn unmount(&self, address: &ServiceAddress) -> bool {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(address)
            .is_some()
    }

    async fn exchange(
        &self,
        frame: WireRequest,
        target: &ServiceTarget,
    ) -> TransportResult<WireReply> {
        let address = target.address();
        if self.closed.load(Ordering::Acquire) {
            return Err(TransportError::Closed {
                address: address.clone(),
            });
        }
        let handler = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(address)
            .cloned()
            .ok_or_else(|| {
                TransportError::connection(
                    address,
                    std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        "no in-process handler mounted",
                    ),
                )
            })?;
        Ok(dispatch(handler.as_ref(), frame).await)
    }
}

#[async_trait]
impl<Req> ProxyTransport<Req, Req::Reply> for InProcessTransport
where
    Req: WireExchange,
{
    async fn send(&self, request: Req, target: &ServiceTarget) -> TransportResult<Req::Reply> {
        let reply = self.exchange(request.into_frame(), target).await?;
        Req::from_frame(reply)
            .map_err(|message| TransportError::protocol(target.address(), message))
    }

    async fn provision(
        &self,
        configuration: Configuration,
        secret: Secret,
        target: &ServiceTarget,
    ) -> TransportResult<ProvisioningReference> {
        let request = ProvisionRequest {
            configuration,
            secret,
        };
        let reply = self.exchange(request.into_frame(), target).await?;
        ProvisionRequest::from_frame(reply)
            .map_err(|message| TransportError::protocol(target.address(), message))
    }

    async fn inquire(&self, target: &ServiceTarget) -> TransportResult<InquireReply> {
        match self.exchange(WireRequest::Inquire, target).await? {
            WireReply::Inquire(reply) => Ok(reply),
            other => Err(TransportError::protocol(
                target.address(),
                format!("expected inquire reply, got {}", other.kind()),
            )),
        }
    }

    fn is_healthy(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }

    fn name(&self) -> &'static str {
        "in-process"
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
