//! Port contracts for proxy transports.

mod transport;

pub use transport::{ProxyTransport, TransportError, TransportResult};
