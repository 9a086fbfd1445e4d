//! Router half of the wire transport.

use super::codec::{FrameError, FrameStream};
use super::dialer::{Dialer, TcpDialer};
use super::frames::{WireExchange, WireReply, WireRequest, unexpected};
use crate::proxy::{
    domain::{Configuration, InquireReply, ProvisionRequest, ProvisioningReference, Secret},
    ports::{ProxyTransport, TransportError, TransportResult},
};
use crate::service_registry::domain::{
    CapabilityType, ServiceAddress, ServiceCategory, ServiceTarget,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::{Instant, timeout, timeout_at};
use tracing::{debug, info, warn};

const TRANSPORT_NAME: &str = "framed-json";

/// Timeouts of the wire transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireSettings {
    connect_timeout: Duration,
    request_timeout: Duration,
    shutdown_grace: Duration,
}

impl Default for WireSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

impl WireSettings {
    /// Sets the limit for establishing a connection.
    #[must_use]
    pub const fn with_connect_timeout(mut self, value: Duration) -> Self {
        self.connect_timeout = value;
        self
    }

    /// Sets the limit for one request/reply round trip.
    #[must_use]
    pub const fn with_request_timeout(mut self, value: Duration) -> Self {
        self.request_timeout = value;
        self
    }

    /// Sets how long [`FramedTransport::shutdown`] waits for busy
    /// connections.
    #[must_use]
    pub const fn with_shutdown_grace(mut self, value: Duration) -> Self {
        self.shutdown_grace = value;
        self
    }

    /// Returns the connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the shutdown grace period.
    #[must_use]
    pub const fn shutdown_grace(&self) -> Duration {
        self.shutdown_grace
    }
}

type SlotKey = (ServiceCategory, CapabilityType);

struct CachedConnection<S> {
    address: ServiceAddress,
    frames: FrameStream<S>,
}

type Slot<S> = Arc<AsyncMutex<Option<CachedConnection<S>>>>;

/// Line-delimited JSON transport with a per-target connection cache.
///
/// Each `(category, capability type)` owns one cache slot, so calls to
/// different targets run in parallel while calls to the same target take
/// turns on its connection. A connection is moved out of its slot for the
/// duration of a round trip and only put back after a complete reply, so a
/// fault or a cancelled caller always drops it.
pub struct FramedTransport<D: Dialer = TcpDialer> {
    dialer: D,
    settings: WireSettings,
    slots: Mutex<HashMap<SlotKey, Slot<D::Stream>>>,
    closed: AtomicBool,
}

impl FramedTransport<TcpDialer> {
    /// Creates a TCP transport.
    #[must_use]
    pub fn tcp(settings: WireSettings) -> Self {
        Self::new(TcpDialer, settings)
    }
}

impl<D: Dialer> FramedTransport<D> {
    /// Creates a transport over the given dialer.
    #[must_use]
    pub fn new(dialer: D, settings: WireSettings) -> Self {
        Self {
            dialer,
            settings,
            slots: Mutex::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Returns the configured timeouts.
    #[must_use]
    pub const fn settings(&self) -> &WireSettings {
        &self.settings
    }

    /// Returns how many targets currently have a cache slot.
    #[must_use]
    pub fn cached_targets(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn ensure_open(&self, target: &ServiceTarget) -> TransportResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TransportError::Closed {
                address: target.address().clone(),
            });
        }
        Ok(())
    }

    fn slot(&self, key: &SlotKey, target: &ServiceTarget) -> TransportResult<Slot<D::Stream>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // Checked under the map lock so no slot appears after shutdown drained
        // the map.
        self.ensure_open(target)?;
        Ok(Arc::clone(slots.entry(key.clone()).or_default()))
    }

    /// Removes `slot` from the cache unless another caller already replaced
    /// it.
    fn forget_slot(&self, key: &SlotKey, slot: &Slot<D::Stream>) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots.get(key).is_some_and(|cached| Arc::ptr_eq(cached, slot)) {
            slots.remove(key);
        }
    }

    /// Drops the cache slot of a target that left the registry, closing its
    /// connection once any in-flight round trip ends.
    pub async fn release(&self, category: ServiceCategory, capability_type: &CapabilityType) {
        let key = (category, capability_type.clone());
        let removed = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);
        let Some(slot) = removed else {
            return;
        };
        let connection = slot.lock().await.take();
        if let Some(mut connection) = connection {
            if let Err(err) = connection.frames.shutdown().await {
                debug!(
                    address = %connection.address,
                    error = %err,
                    "connection shutdown failed"
                );
            }
            debug!(%category, %capability_type, "released provider connection");
        }
    }

    async fn connect(
        &self,
        address: &ServiceAddress,
    ) -> TransportResult<CachedConnection<D::Stream>> {
        let limit = self.settings.connect_timeout;
        let stream = timeout(limit, self.dialer.dial(address))
            .await
            .map_err(|_| TransportError::Timeout {
                address: address.clone(),
                operation: "connect",
                after: limit,
            })?
            .map_err(|err| TransportError::connection(address, err))?;
        debug!(%address, "opened provider connection");
        Ok(CachedConnection {
            address: address.clone(),
            frames: FrameStream::new(stream),
        })
    }

    async fn round_trip(
        &self,
        connection: &mut CachedConnection<D::Stream>,
        frame: &WireRequest,
    ) -> TransportResult<WireReply> {
        let address = connection.address.clone();
        let limit = self.settings.request_timeout;
        let exchange = async {
            connection
                .frames
                .write_frame(frame)
                .await
                .map_err(|err| TransportError::connection(&address, err))?;
            connection
                .frames
                .read_frame::<WireReply>()
                .await
                .map_err(|err| match err {
                    FrameError::Io(io) => TransportError::connection(&address, io),
                    FrameError::Closed => TransportError::connection(
                        &address,
                        std::io::Error::new(std::io::ErrorKind::UnexpectedEof, err.to_string()),
                    ),
                    FrameError::TooLarge | FrameError::Malformed(_) => {
                        TransportError::protocol(&address, err.to_string())
                    }
                })
        };
        match timeout(limit, exchange).await {
            Ok(reply) => reply,
            Err(_) => Err(TransportError::Timeout {
                address: address.clone(),
                operation: frame.kind(),
                after: limit,
            }),
        }
    }

    /// Sends a frame over the target's cached connection.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the transport is closed, the
    /// connection cannot be established, or the round trip fails.
    pub async fn exchange(
        &self,
        frame: WireRequest,
        target: &ServiceTarget,
    ) -> TransportResult<WireReply> {
        let key = (target.category(), target.capability_type().clone());
        let slot = self.slot(&key, target)?;
        let mut cached = slot.lock().await;
        let connection = match cached.take() {
            Some(existing) if existing.address == *target.address() => Ok(existing),
            Some(stale) => {
                debug!(
                    previous = %stale.address,
                    current = %target.address(),
                    capability_type = %target.capability_type(),
                    "target address changed; replacing cached connection"
                );
                drop(stale);
                self.connect(target.address()).await
            }
            None => self.connect(target.address()).await,
        };

        let reply = match connection {
            Ok(mut connection) => {
                let reply = self.round_trip(&mut connection, &frame).await;
                if reply.is_ok() {
                    *cached = Some(connection);
                }
                reply
            }
            Err(err) => Err(err),
        };
        if let Err(err) = &reply {
            debug!(error = %err, "dropping faulted provider connection");
            self.forget_slot(&key, &slot);
        }
        reply
    }

    async fn one_shot(
        &self,
        frame: WireRequest,
        target: &ServiceTarget,
    ) -> TransportResult<WireReply> {
        self.ensure_open(target)?;
        let mut connection = self.connect(target.address()).await?;
        let reply = self.round_trip(&mut connection, &frame).await;
        if let Err(err) = connection.frames.shutdown().await {
            debug!(
                address = %connection.address,
                error = %err,
                "one-shot connection shutdown failed"
            );
        }
        reply
    }

    /// Refuses new calls and releases every cached connection.
    ///
    /// Busy connections get the configured grace period to finish their
    /// round trip; any still busy afterwards are dropped by their callers as
    /// soon as those calls end.
    pub async fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        let drained: Vec<(SlotKey, Slot<D::Stream>)> = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .collect();
        let deadline = Instant::now() + self.settings.shutdown_grace;
        let mut forced = 0_usize;
        for ((category, capability_type), slot) in drained {
            let release = async {
                let mut cached = slot.lock().await;
                if let Some(mut connection) = cached.take()
                    && let Err(err) = connection.frames.shutdown().await
                {
                    debug!(
                        address = %connection.address,
                        error = %err,
                        "connection shutdown failed"
                    );
                }
            };
            if timeout_at(deadline, release).await.is_err() {
                warn!(
                    %category,
                    %capability_type,
                    "connection still busy after shutdown grace; forcing close"
                );
                forced += 1;
            }
        }
        info!(transport = TRANSPORT_NAME, forced, "transport closed");
    }
}

#[async_trait]
impl<Req, D> ProxyTransport<Req, Req::Reply> for FramedTransport<D>
where
    Req: WireExchange,
    D: Dialer,
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
        let reply = self.one_shot(request.into_frame(), target).await?;
        ProvisionRequest::from_frame(reply)
            .map_err(|message| TransportError::protocol(target.address(), message))
    }

    async fn inquire(&self, target: &ServiceTarget) -> TransportResult<InquireReply> {
        match self.one_shot(WireRequest::Inquire, target).await? {
            WireReply::Inquire(reply) => Ok(reply),
            other => Err(TransportError::protocol(
                target.address(),
                unexpected("inquire", &other),
            )),
        }
    }

    fn is_healthy(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }

    fn name(&self) -> &'static str {
        TRANSPORT_NAME
    }

    async fn close(&self) {
        self.shutdown().await;
    }
}
