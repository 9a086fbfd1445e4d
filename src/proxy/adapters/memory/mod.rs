//! In-process transport.

mod transport;

pub use transport::InProcessTransport;
