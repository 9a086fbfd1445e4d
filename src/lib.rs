//! Switchyard: a capability router.
//!
//! Capability providers (tool invokers and resource providers) register
//! their network address with the router under a capability type. The
//! router resolves the provider for each proxied call, forwards the call
//! over a pluggable transport, and seeds providers with configuration and
//! secret material before first use.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: value types and invariants with no I/O
//! - **Ports**: async trait seams for storage, transport and discovery
//! - **Adapters**: in-memory, HTTP, file and wire implementations
//! - **Services**: orchestration over ports
//!
//! # Modules
//!
//! - [`service_registry`]: target registry, resolver and registration API
//! - [`proxy`]: invoker and resource acquirer proxies over a transport
//! - [`registration`]: provider-side registration lifecycle
//! - [`config`]: router and provider settings
//! - [`telemetry`]: tracing subscriber installation
//! - [`runtime`]: composition roots

pub mod config;
pub mod proxy;
pub mod registration;
pub mod runtime;
pub mod service_registry;
pub mod telemetry;
