//! Line-delimited JSON transport over byte streams.
//!
//! Each frame is one JSON object terminated by `\n`, tagged with a `kind`
//! (`invoke`, `acquire`, `provision`, `inquire`, or `fault` on replies) and
//! carrying its body under `payload`. The router half is
//! [`FramedTransport`]; the provider half is [`CapabilityServer`].

mod codec;
mod dialer;
mod frames;
mod server;
mod transport;

pub use dialer::{Dialer, TcpDialer};
pub use frames::{WireExchange, WireReply, WireRequest};
pub use server::{CapabilityHandler, CapabilityServer, dispatch};
pub use transport::{FramedTransport, WireSettings};
