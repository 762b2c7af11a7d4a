//! The recorder capability shared by the relay and its clients.
//!
//! Both sides of the pipeline record request samples, but they do different
//! things with them: the relay observes them straight into its Prometheus
//! registry ([`InProcessRecorder`]), while a client buffers them and forwards
//! them on flush ([`MetricsClient`](crate::client::MetricsClient)).

pub mod in_process;

pub use in_process::InProcessRecorder;

use crate::client::ClientError;
use crate::exposition::ExpositionError;
use crate::models::MetricSample;
use std::future::Future;
use thiserror::Error;

/// Errors surfaced by a recorder's `flush` or `expose`.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// Rendering the Prometheus registry failed.
    #[error(transparent)]
    Exposition(#[from] ExpositionError),

    /// Forwarding to the relay failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Serializing pending samples failed.
    #[error("Failed to serialize pending metrics: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// What a flush did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// This many samples were delivered.
    Sent(usize),
    /// The relay refused some batches outright; those samples were discarded.
    Rejected {
        /// Samples delivered.
        sent: usize,
        /// Samples discarded after a non-retryable rejection.
        dropped: usize,
    },
    /// Nothing was pending.
    Empty,
    /// The relay was unhealthy; samples are kept for the next attempt.
    Skipped,
}

/// Something that records request samples and can publish them.
pub trait Recorder: Send + Sync {
    /// Records one sample. Never fails; invalid samples are dropped.
    fn record_sample(&self, sample: MetricSample);

    /// Records one request.
    fn record(&self, method: &str, route: &str, status: u16, duration_seconds: f64) {
        self.record_sample(MetricSample::new(method, route, status, duration_seconds));
    }

    /// Publishes whatever has been recorded.
    fn flush(&self) -> impl Future<Output = Result<FlushOutcome, RecorderError>> + Send;

    /// Renders the recorder's current view as text.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn expose(&self) -> Result<String, RecorderError>;
}
