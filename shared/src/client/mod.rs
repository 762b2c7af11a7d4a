//! Client side of the metrics pipeline.
//!
//! [`MetricsClient`] buffers samples for outbound calls and forwards them to
//! the relay; [`HealthProber`] gates those forwards on relay liveness.

pub mod config;
pub mod health;
pub mod metrics_client;

pub use config::ClientConfig;
pub use health::HealthProber;
pub use metrics_client::MetricsClient;

use thiserror::Error;

/// Errors that can occur when talking to the relay.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The request failed before a response arrived (connect, timeout, body).
    #[error("Request to relay failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The relay answered with a non-success status.
    #[error("Relay responded with status {0}")]
    Status(u16),

    /// The relay answered but reported itself unhealthy.
    #[error("Relay reported status '{0}'")]
    Unhealthy(String),
}

impl ClientError {
    /// Returns true if sending the same request again may succeed.
    ///
    /// Client errors other than 408 and 429 mean the relay will reject the
    /// same body every time.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status(code) => !(400..500).contains(code) || *code == 408 || *code == 429,
            Self::Build(_) | Self::Transport(_) | Self::Unhealthy(_) => true,
        }
    }
}
