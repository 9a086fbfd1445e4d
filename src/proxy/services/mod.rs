//! Invocation orchestration over a resolver and a transport.
//!
//! [`InvokerProxy`] serves tool invocations and [`ResourceAcquirerProxy`]
//! serves resource reads. Both resolve their target on every call, never
//! retry, and surface transport faults as [`ProxyError::ServiceUnavailable`].

mod acquirer;
mod error;
mod invoker;
mod shared;

pub use acquirer::ResourceAcquirerProxy;
pub use error::{ProxyError, ProxyResult};
pub use invoker::InvokerProxy;
