//! Transport adapters for the proxy port.

pub mod memory;
pub mod wire;
