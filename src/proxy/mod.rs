//! Proxy orchestration between invocation callers and capability providers.
//!
//! A proxied call resolves its target through the service registry, hands a
//! request to a [`ports::ProxyTransport`], and interprets the reply. The
//! transport port is generic over request and reply types so the same
//! orchestration runs over the line-delimited JSON wire transport, the
//! in-process transport, or anything else implementing the port.
//!
//! - Exchange messages and provisioning types in [`domain`]
//! - The transport port in [`ports`]
//! - Wire and in-process transports in [`adapters`]
//! - Invoker and resource acquirer proxies in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
