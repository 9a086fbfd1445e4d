//! Domain model for capability provider targets.
//!
//! A target names one provider instance: the capability type it serves, the
//! category it serves it under, where it listens, and the free-form
//! configuration it advertises. Health bookkeeping rides alongside as a
//! best-effort side channel and never influences resolution.

mod address;
mod capability;
mod category;
mod error;
mod health;
mod ids;
mod target;

pub use address::ServiceAddress;
pub use capability::CapabilityType;
pub use category::ServiceCategory;
pub use error::{ParseServiceCategoryError, RegistryDomainError};
pub use health::{HealthReport, HealthState, TargetHealth};
pub use ids::TargetId;
pub use target::ServiceTarget;
