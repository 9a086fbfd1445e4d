//! Provider half of the wire transport.

use super::codec::{FrameError, FrameStream};
use super::frames::{WireReply, WireRequest};
use crate::proxy::domain::{
    InquireReply, ProvisionRequest, ProvisioningReference, ResourceReply, ResourceRequest,
    ToolInvokeReply, ToolInvokeRequest,
};
use async_trait::async_trait;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Capability implementation behind a [`CapabilityServer`].
///
/// Every method has a default that reports the operation as unsupported, so
/// a provider implements only the capabilities it serves.
#[async_trait]
pub trait CapabilityHandler: Send + Sync + 'static {
    /// Executes a tool invocation.
    async fn invoke(&self, _request: ToolInvokeRequest) -> ToolInvokeReply {
        ToolInvokeReply {
            is_error: true,
            content: vec!["tool invocation is not supported by this provider".to_owned()],
        }
    }

    /// Serves a resource read.
    async fn acquire(&self, _request: ResourceRequest) -> ResourceReply {
        ResourceReply {
            is_error: true,
            content: vec!["resource acquisition is not supported by this provider".to_owned()],
        }
    }

    /// Stores provisioned material and returns where it lives.
    ///
    /// # Errors
    ///
    /// Returns a message sent back to the router as a fault frame.
    async fn provision(&self, _request: ProvisionRequest) -> Result<ProvisioningReference, String> {
        Err("provisioning is not supported by this provider".to_owned())
    }

    /// Lists the configuration keys this provider understands.
    async fn inquire(&self) -> InquireReply {
        InquireReply::default()
    }
}

/// Routes one request frame to the handler and wraps its answer.
pub async fn dispatch<H>(handler: &H, frame: WireRequest) -> WireReply
where
    H: CapabilityHandler + ?Sized,
{
    match frame {
        WireRequest::Invoke(request) => WireReply::Invoke(handler.invoke(request).await),
        WireRequest::Acquire(request) => WireReply::Acquire(handler.acquire(request).await),
        WireRequest::Provision(request) => match handler.provision(request).await {
            Ok(reference) => WireReply::Provision(reference),
            Err(message) => WireReply::Fault { message },
        },
        WireRequest::Inquire => WireReply::Inquire(handler.inquire().await),
    }
}

/// TCP listener serving the capability protocol for one handler.
pub struct CapabilityServer<H> {
    listener: TcpListener,
    handler: Arc<H>,
}

impl<H: CapabilityHandler> CapabilityServer<H> {
    /// Binds a listener.
    ///
    /// # Errors
    ///
    /// Returns the bind error.
    pub async fn bind(address: impl ToSocketAddrs, handler: Arc<H>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(address).await?;
        Ok(Self::from_listener(listener, handler))
    }

    /// Serves on an already bound listener.
    #[must_use]
    pub const fn from_listener(listener: TcpListener, handler: Arc<H>) -> Self {
        Self { listener, handler }
    }

    /// Returns the bound address.
    ///
    /// # Errors
    ///
    /// Returns the socket error.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves until the task is dropped.
    pub async fn serve(self) {
        self.serve_with_shutdown(std::future::pending()).await;
    }

    /// Serves until `shutdown` completes, then aborts open connections.
    pub async fn serve_with_shutdown(self, shutdown: impl Future<Output = ()> + Send) {
        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let handler = Arc::clone(&self.handler);
                        connections.spawn(serve_connection(stream, peer, handler));
                    }
                    Err(err) => warn!(error = %err, "failed to accept router connection"),
                },
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }
        info!(open = connections.len(), "capability server stopping");
        connections.shutdown().await;
    }
}

async fn serve_connection<H: CapabilityHandler>(
    stream: TcpStream,
    peer: SocketAddr,
    handler: Arc<H>,
) {
    let mut frames = FrameStream::new(stream);
    loop {
        let reply = match frames.read_frame::<WireRequest>().await {
            Ok(frame) => {
                debug!(%peer, kind = frame.kind(), "capability frame received");
                dispatch(handler.as_ref(), frame).await
            }
            Err(FrameError::Malformed(err)) => WireReply::Fault {
                message: format!("malformed frame: {err}"),
            },
            Err(FrameError::Closed) => break,
            Err(err) => {
                debug!(%peer, error = %err, "closing router connection");
                break;
            }
        };
        if let Err(err) = frames.write_frame(&reply).await {
            debug!(%peer, error = %err, "failed to write reply frame");
            break;
        }
    }
}
