//! Connection establishment for the wire transport.

use crate::service_registry::domain::ServiceAddress;
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Opens byte streams to provider addresses.
#[async_trait]
pub trait Dialer: Send + Sync + 'static {
    /// Stream type produced by this dialer.
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    /// Opens a new stream to `address`.
    async fn dial(&self, address: &ServiceAddress) -> std::io::Result<Self::Stream>;
}

/// Dials providers over TCP.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpDialer;

#[async_trait]
impl Dialer for TcpDialer {
    type Stream = TcpStream;

    async fn dial(&self, address: &ServiceAddress) -> std::io::Result<Self::Stream> {
        let host = address.host().trim_start_matches('[').trim_end_matches(']');
        let stream = TcpStream::connect((host, address.port())).await?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}
