//! Client configuration.

use std::time::Duration;

/// Default relay address.
pub const DEFAULT_RELAY_URL: &str = "http://localhost:9090";

/// Default number of samples per upload.
///
/// A labelled sample costs roughly 120 bytes on the wire, so a full batch
/// stays far below the relay's default 1 MiB body limit.
pub const DEFAULT_MAX_BATCH_SAMPLES: usize = 500;

/// Where the relay lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the relay, without a trailing slash.
    pub relay_url: String,
    /// Timeout for metric uploads.
    pub request_timeout: Duration,
    /// Timeout for the liveness probe.
    pub probe_timeout: Duration,
    /// Upper bound on samples sent in one `/update-metrics` body.
    pub max_batch_samples: usize,
}

impl ClientConfig {
    /// Creates a configuration for the given relay with default timeouts.
    #[must_use]
    pub fn new(relay_url: impl Into<String>) -> Self {
        Self {
            relay_url: relay_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Sets the upload timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the probe timeout.
    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Sets the number of samples per upload. Zero is treated as one.
    #[must_use]
    pub fn with_max_batch_samples(mut self, samples: usize) -> Self {
        self.max_batch_samples = samples.max(1);
        self
    }

    /// Returns the absolute URL of a relay path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.relay_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_url: DEFAULT_RELAY_URL.to_string(),
            request_timeout: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(2),
            max_batch_samples: DEFAULT_MAX_BATCH_SAMPLES,
        }
    }
}
