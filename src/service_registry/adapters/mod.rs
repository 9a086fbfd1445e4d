//! Adapter implementations for the service registry port.

pub mod http;
pub mod memory;
