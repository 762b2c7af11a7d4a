//! Recorder that observes directly into the local Prometheus registry.

use super::{FlushOutcome, Recorder, RecorderError};
use crate::exposition::HttpCollectors;
use crate::models::MetricSample;

/// Relay-side recorder: samples land in [`HttpCollectors`] immediately, so
/// flushing has nothing to do.
#[derive(Clone)]
pub struct InProcessRecorder {
    collectors: HttpCollectors,
}

impl InProcessRecorder {
    /// Creates a recorder over the given collectors.
    #[must_use]
    pub fn new(collectors: HttpCollectors) -> Self {
        Self { collectors }
    }
}

impl Recorder for InProcessRecorder {
    fn record_sample(&self, sample: MetricSample) {
        if let Err(e) = sample.validate_sample() {
            tracing::warn!(error = %e, ?sample, "Dropping invalid metric sample");
            return;
        }
        self.collectors.observe_sample(&sample);
    }

    async fn flush(&self) -> Result<FlushOutcome, RecorderError> {
        Ok(FlushOutcome::Empty)
    }

    fn expose(&self) -> Result<String, RecorderError> {
        Ok(self.collectors.render()?)
    }
}
