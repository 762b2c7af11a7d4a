//! Relay liveness probe.

use super::{ClientConfig, ClientError};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct HealthBody {
    status: String,
}

/// Checks whether the relay is up before metrics are sent to it.
#[derive(Debug, Clone)]
pub struct HealthProber {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HealthProber {
    /// Creates a prober that shares an existing HTTP client.
    #[must_use]
    pub fn with_client(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            url: config.endpoint("/health"),
            timeout: config.probe_timeout,
        }
    }

    /// Creates a prober with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self::with_client(http, config))
    }

    /// Returns true if the relay answered `GET /health` with a 2xx status and
    /// `"status": "ok"` within the probe timeout.
    pub async fn is_healthy(&self) -> bool {
        match self.probe().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "Relay health check failed");
                false
            }
        }
    }

    async fn probe(&self) -> Result<(), ClientError> {
        let response = self
            .http
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let body: HealthBody = response.json().await?;
        if body.status == "ok" {
            Ok(())
        } else {
            Err(ClientError::Unhealthy(body.status))
        }
    }
}
