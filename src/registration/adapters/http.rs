//! HTTP client of the router's registration API.

use crate::registration::ports::{DiscoveryClient, DiscoveryError, DiscoveryResult};
use crate::service_registry::{
    adapters::http::{ApiResponse, TARGETS_PATH},
    domain::{HealthReport, ServiceTarget, TargetId},
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Discovery client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDiscoveryClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDiscoveryClient {
    /// Creates a client for the router at `router_url`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(router_url: &str, timeout: Duration) -> DiscoveryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DiscoveryError::transport)?;
        Ok(Self::with_client(client, router_url))
    }

    /// Creates a client over an existing `reqwest` client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, router_url: &str) -> Self {
        Self {
            client,
            base_url: format!("{}{TARGETS_PATH}", router_url.trim_end_matches('/')),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn read_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> DiscoveryResult<T> {
        let status = response.status();
        let body = response.text().await.map_err(DiscoveryError::transport)?;
        if !status.is_success() {
            let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or(body);
            return Err(DiscoveryError::Status {
                status: status.as_u16(),
                message,
            });
        }
        let envelope: ApiResponse<T> = serde_json::from_str(&body)
            .map_err(|err| DiscoveryError::MalformedResponse(err.to_string()))?;
        envelope
            .data
            .ok_or_else(|| DiscoveryError::MalformedResponse("response carried no data".to_owned()))
    }
}

#[async_trait]
impl DiscoveryClient for HttpDiscoveryClient {
    async fn register(&self, target: &ServiceTarget) -> DiscoveryResult<ServiceTarget> {
        let response = self
            .client
            .post(self.url("register"))
            .json(target)
            .send()
            .await
            .map_err(DiscoveryError::transport)?;
        Self::read_envelope(response).await
    }

    async fn deregister(&self, target: &ServiceTarget) -> DiscoveryResult<()> {
        let response = self
            .client
            .post(self.url("deregister"))
            .json(target)
            .send()
            .await
            .map_err(DiscoveryError::transport)?;
        Self::read_envelope::<bool>(response).await.map(|_| ())
    }

    async fn ping(&self, id: &TargetId) -> DiscoveryResult<()> {
        let response = self
            .client
            .post(self.url(&format!("{id}/ping")))
            .send()
            .await
            .map_err(DiscoveryError::transport)?;
        Self::read_envelope::<bool>(response).await.map(|_| ())
    }

    async fn update_state(&self, id: &TargetId, report: &HealthReport) -> DiscoveryResult<()> {
        let response = self
            .client
            .put(self.url(&format!("{id}/state")))
            .json(report)
            .send()
            .await
            .map_err(DiscoveryError::transport)?;
        Self::read_envelope::<bool>(response).await.map(|_| ())
    }
}
