//! Best-effort health bookkeeping for registered targets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health update as sent by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    healthy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl HealthReport {
    /// Creates a healthy report.
    #[must_use]
    pub const fn healthy() -> Self {
        Self {
            healthy: true,
            reason: None,
        }
    }

    /// Creates an unhealthy report with a reason.
    #[must_use]
    pub fn unhealthy(reason: impl Into<String>) -> Self {
        let normalized = reason.into().trim().to_owned();
        Self {
            healthy: false,
            reason: (!normalized.is_empty()).then_some(normalized),
        }
    }

    /// Returns whether the provider considers itself healthy.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.healthy
    }

    /// Returns the failure reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Stamps the report with the time it was received.
    #[must_use]
    pub fn at(self, timestamp: DateTime<Utc>) -> HealthState {
        HealthState {
            healthy: self.healthy,
            reason: self.reason,
            timestamp,
        }
    }
}

/// Timestamped health state stored by the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthState {
    healthy: bool,
    reason: Option<String>,
    timestamp: DateTime<Utc>,
}

impl HealthState {
    /// Returns whether the target was last reported healthy.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.healthy
    }

    /// Returns the last failure reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns when the state was recorded.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Liveness record kept per registered target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetHealth {
    last_seen: DateTime<Utc>,
    last_state: Option<HealthState>,
}

impl TargetHealth {
    /// Creates a record for a target first seen at `at`.
    #[must_use]
    pub const fn seen_at(at: DateTime<Utc>) -> Self {
        Self {
            last_seen: at,
            last_state: None,
        }
    }

    /// Returns the last time the provider contacted the router.
    #[must_use]
    pub const fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    /// Returns the last explicit health report.
    #[must_use]
    pub const fn last_state(&self) -> Option<&HealthState> {
        self.last_state.as_ref()
    }

    /// Records contact at `at`; timestamps never move backwards.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        if at > self.last_seen {
            self.last_seen = at;
        }
    }

    /// Records an explicit health report, which also counts as contact.
    pub fn record(&mut self, state: HealthState) {
        self.touch(state.timestamp());
        self.last_state = Some(state);
    }
}
