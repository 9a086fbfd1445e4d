//! Capability categories a provider can serve under.

use super::ParseServiceCategoryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category partitioning the registry.
///
/// The same capability type may be registered once per category; lookups and
/// removals never cross category boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    /// Provider executes tool invocations.
    ToolInvoker,
    /// Provider serves resource reads.
    ResourceProvider,
}

impl ServiceCategory {
    /// Every category, in listing order.
    pub const ALL: [Self; 2] = [Self::ToolInvoker, Self::ResourceProvider];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToolInvoker => "tool_invoker",
            Self::ResourceProvider => "resource_provider",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceCategory {
    type Error = ParseServiceCategoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "tool_invoker" => Ok(Self::ToolInvoker),
            "resource_provider" => Ok(Self::ResourceProvider),
            _ => Err(ParseServiceCategoryError(value.to_owned())),
        }
    }
}
