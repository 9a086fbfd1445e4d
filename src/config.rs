//! Router and provider settings.
//!
//! Settings deserialize from JSON with every field optional, so a file only
//! names what it overrides. Durations are whole seconds or milliseconds as
//! the field names say.

use crate::proxy::adapters::wire::WireSettings;
use crate::registration::domain::RetryPolicy;
use crate::service_registry::domain::{
    CapabilityType, RegistryDomainError, ServiceAddress, ServiceCategory, ServiceTarget,
};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating settings.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("cannot read settings file {path}: {source}")]
    Io {
        /// File path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: Arc<std::io::Error>,
    },
    /// The settings file is not valid JSON for the settings type.
    #[error("cannot parse settings file {path}: {message}")]
    Parse {
        /// File path.
        path: Utf8PathBuf,
        /// Decoder message.
        message: String,
    },
    /// A value is out of range.
    #[error("invalid setting {field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why it is rejected.
        reason: String,
    },
    /// A value does not form a valid domain value.
    #[error(transparent)]
    Domain(#[from] RegistryDomainError),
}

/// Reads settings of type `T` from a JSON file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file cannot be read and
/// [`ConfigError::Parse`] when it does not decode.
pub fn load_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, ConfigError> {
    let io_error = |err: std::io::Error| ConfigError::Io {
        path: path.to_owned(),
        source: Arc::new(err),
    };
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        io_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "settings path has no file name",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;
    let contents = dir.read_to_string(file_name).map_err(io_error)?;
    serde_json::from_str(&contents).map_err(|err| ConfigError::Parse {
        path: path.to_owned(),
        message: err.to_string(),
    })
}

fn require_positive(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            field,
            reason: "must be greater than zero".to_owned(),
        });
    }
    Ok(())
}

/// Upper bound for `stale_after_secs`: one year of silence.
pub const MAX_STALE_AFTER_SECS: u64 = 365 * 24 * 60 * 60;

/// Settings of the router process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterSettings {
    /// Address the registration API listens on.
    pub bind_address: String,
    /// Limit for opening a provider connection, in milliseconds.
    pub connect_timeout_ms: u64,
    /// Limit for one provider round trip, in milliseconds.
    pub request_timeout_ms: u64,
    /// Grace period for busy connections at shutdown, in milliseconds.
    pub shutdown_grace_ms: u64,
    /// Silence after which a target counts as stale, in seconds.
    pub stale_after_secs: u64,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_owned(),
            connect_timeout_ms: 5_000,
            request_timeout_ms: 30_000,
            shutdown_grace_ms: 5_000,
            stale_after_secs: 300,
        }
    }
}

impl RouterSettings {
    /// Sets the registration API listen address.
    #[must_use]
    pub fn with_bind_address(mut self, address: impl Into<String>) -> Self {
        self.bind_address = address.into();
        self
    }

    /// Sets the provider round trip limit.
    #[must_use]
    pub fn with_request_timeout(mut self, value: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero timeouts or an empty bind
    /// address.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "bind_address",
                reason: "must not be empty".to_owned(),
            });
        }
        require_positive("connect_timeout_ms", self.connect_timeout_ms)?;
        require_positive("request_timeout_ms", self.request_timeout_ms)?;
        require_positive("stale_after_secs", self.stale_after_secs)?;
        if self.stale_after_secs > MAX_STALE_AFTER_SECS {
            return Err(ConfigError::Invalid {
                field: "stale_after_secs",
                reason: format!("must not exceed {MAX_STALE_AFTER_SECS}"),
            });
        }
        Ok(())
    }

    /// Returns the wire transport timeouts.
    #[must_use]
    pub fn wire_settings(&self) -> WireSettings {
        WireSettings::default()
            .with_connect_timeout(Duration::from_millis(self.connect_timeout_ms))
            .with_request_timeout(Duration::from_millis(self.request_timeout_ms))
            .with_shutdown_grace(Duration::from_millis(self.shutdown_grace_ms))
    }

    /// Returns the silence threshold for stale target eviction.
    #[must_use]
    pub fn stale_after(&self) -> chrono::Duration {
        i64::try_from(self.stale_after_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

/// Settings of a capability provider process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderSettings {
    /// Base URL of the router's registration API.
    pub router_url: String,
    /// Capability type served.
    pub capability_type: String,
    /// Category served under.
    pub category: ServiceCategory,
    /// Host the router should dial.
    pub host: String,
    /// Port the router should dial.
    pub port: u16,
    /// Configuration advertised with the registration.
    pub configurations: BTreeMap<String, String>,
    /// Directory holding the registration identity record.
    pub data_dir: Utf8PathBuf,
    /// Registration attempts per call.
    pub registration_retries: u32,
    /// Pause between registration attempts, in seconds.
    pub retry_wait_secs: u64,
    /// Interval of the registration heartbeat, in seconds.
    pub heartbeat_secs: u64,
    /// HTTP timeout for registration API calls, in seconds.
    pub http_timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            router_url: "http://127.0.0.1:8080".to_owned(),
            capability_type: String::new(),
            category: ServiceCategory::ToolInvoker,
            host: "127.0.0.1".to_owned(),
            port: 9000,
            configurations: BTreeMap::new(),
            data_dir: Utf8PathBuf::from("data"),
            registration_retries: 3,
            retry_wait_secs: 5,
            heartbeat_secs: 30,
            http_timeout_secs: 10,
        }
    }
}

impl ProviderSettings {
    /// Creates settings for one capability served at `host:port`.
    #[must_use]
    pub fn new(
        capability_type: impl Into<String>,
        category: ServiceCategory,
        host: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            capability_type: capability_type.into(),
            category,
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Sets the router URL.
    #[must_use]
    pub fn with_router_url(mut self, url: impl Into<String>) -> Self {
        self.router_url = url.into();
        self
    }

    /// Sets the identity data directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Sets the retry budget and pause.
    #[must_use]
    pub const fn with_retries(mut self, attempts: u32, wait_secs: u64) -> Self {
        self.registration_retries = attempts;
        self.retry_wait_secs = wait_secs;
        self
    }

    /// Adds an advertised configuration option.
    #[must_use]
    pub fn with_configuration(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.configurations.insert(key.into(), value.into());
        self
    }

    /// Checks value ranges and domain validity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an invalid target, router URL or
    /// intervals.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.target()?;
        let url = self.router_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "router_url",
                reason: format!("'{url}' must start with http:// or https://"),
            });
        }
        require_positive("registration_retries", u64::from(self.registration_retries))?;
        require_positive("heartbeat_secs", self.heartbeat_secs)?;
        require_positive("http_timeout_secs", self.http_timeout_secs)
    }

    /// Builds the unregistered target this provider announces.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Domain`] when the capability type or address
    /// is invalid.
    pub fn target(&self) -> Result<ServiceTarget, ConfigError> {
        let capability_type = CapabilityType::new(self.capability_type.as_str())?;
        let address = ServiceAddress::new(self.host.as_str(), self.port)?;
        Ok(ServiceTarget::new(capability_type, address, self.category)
            .with_configurations(self.configurations.clone()))
    }

    /// Returns the registration retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.registration_retries,
            Duration::from_secs(self.retry_wait_secs),
        )
    }

    /// Returns the heartbeat interval.
    #[must_use]
    pub const fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }

    /// Returns the registration API timeout.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
