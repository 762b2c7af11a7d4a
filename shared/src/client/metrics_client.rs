//! Buffering instrumentation client.

use super::{ClientConfig, ClientError, HealthProber};
use crate::models::{MetricSample, MetricsUpdate};
use crate::recorder::{FlushOutcome, Recorder, RecorderError};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Records samples for outbound calls and forwards them to the relay.
///
/// Recording never fails and never touches the network. A flush that fails
/// transiently keeps the samples so the next flush sends them again.
#[derive(Debug)]
pub struct MetricsClient {
    http: reqwest::Client,
    config: ClientConfig,
    prober: HealthProber,
    buffer: Mutex<Vec<MetricSample>>,
}

impl MetricsClient {
    /// Creates a client for the configured relay.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(ClientError::Build)?;
        let prober = HealthProber::with_client(http.clone(), &config);

        Ok(Self {
            http,
            config,
            prober,
            buffer: Mutex::new(Vec::new()),
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the liveness prober for the relay.
    #[must_use]
    pub fn prober(&self) -> &HealthProber {
        &self.prober
    }

    // A panic while holding the lock cannot leave the Vec half-written.
    fn buffer(&self) -> MutexGuard<'_, Vec<MetricSample>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the samples waiting to be flushed.
    #[must_use]
    pub fn pending(&self) -> Vec<MetricSample> {
        self.buffer().clone()
    }

    /// Returns the update the next flush would send.
    #[must_use]
    pub fn pending_update(&self) -> MetricsUpdate {
        MetricsUpdate::from_samples(&self.buffer())
    }

    /// Sends `request` and records its duration and outcome under `route`.
    ///
    /// Transport failures are recorded with status 500 and then returned to
    /// the caller unchanged.
    ///
    /// # Errors
    ///
    /// Returns the request's own error; recording never fails.
    pub async fn instrument(
        &self,
        method: &str,
        route: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let start = Instant::now();
        let result = request.send().await;
        let duration = start.elapsed().as_secs_f64();

        let status = match &result {
            Ok(response) => response.status().as_u16(),
            Err(_) => 500,
        };
        self.record(method, route, status, duration);

        result
    }

    /// Sends every pending sample to the relay, in batches of at most
    /// [`ClientConfig::max_batch_samples`].
    ///
    /// Delivered batches are dropped from the buffer. A batch the relay
    /// rejects with a non-retryable status (e.g. 413) is discarded and
    /// logged, and the flush moves on to the next batch. On a retryable
    /// failure the undelivered samples are put back ahead of anything
    /// recorded in the meantime and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if an upload fails in a way that may succeed later.
    pub async fn flush(&self) -> Result<FlushOutcome, ClientError> {
        let pending = std::mem::take(&mut *self.buffer());
        if pending.is_empty() {
            return Ok(FlushOutcome::Empty);
        }

        let batch_size = self.config.max_batch_samples.max(1);
        let mut sent = 0;
        let mut dropped = 0;
        let mut offset = 0;

        while offset < pending.len() {
            let end = (offset + batch_size).min(pending.len());
            let update = MetricsUpdate::from_samples(&pending[offset..end]);
            let count = end - offset;

            match self.send(&update).await {
                Ok(()) => sent += count,
                Err(e) if !e.is_retryable() => {
                    tracing::error!(error = %e, count, "Relay rejected metrics batch, dropping it");
                    dropped += count;
                }
                Err(e) => {
                    let retained = self.restore(pending[offset..].to_vec());
                    tracing::error!(error = %e, sent, retained, "Failed to send metrics");
                    return Err(e);
                }
            }
            offset = end;
        }

        tracing::debug!(sent, dropped, "Flushed metrics to relay");
        if dropped == 0 {
            Ok(FlushOutcome::Sent(sent))
        } else {
            Ok(FlushOutcome::Rejected { sent, dropped })
        }
    }

    /// Puts undelivered samples back ahead of newer ones and returns the
    /// buffer length.
    fn restore(&self, undelivered: Vec<MetricSample>) -> usize {
        let mut buffer = self.buffer();
        let recorded_meanwhile = std::mem::replace(&mut *buffer, undelivered);
        buffer.extend(recorded_meanwhile);
        buffer.len()
    }

    /// Probes the relay and flushes only if it is healthy.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay is healthy but the upload fails.
    pub async fn flush_if_healthy(&self) -> Result<FlushOutcome, ClientError> {
        if !self.prober.is_healthy().await {
            tracing::warn!(
                pending = self.buffer().len(),
                "Metrics relay is not healthy, skipping flush"
            );
            return Ok(FlushOutcome::Skipped);
        }
        self.flush().await
    }

    async fn send(&self, update: &MetricsUpdate) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.config.endpoint("/update-metrics"))
            .timeout(self.config.request_timeout)
            .json(update)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ClientError::Status(status.as_u16()))
        }
    }
}

impl Recorder for MetricsClient {
    fn record_sample(&self, sample: MetricSample) {
        if let Err(e) = sample.validate_sample() {
            tracing::warn!(error = %e, ?sample, "Dropping invalid metric sample");
            return;
        }
        self.buffer().push(sample);
    }

    async fn flush(&self) -> Result<FlushOutcome, RecorderError> {
        Ok(MetricsClient::flush(self).await?)
    }

    fn expose(&self) -> Result<String, RecorderError> {
        Ok(serde_json::to_string_pretty(&self.pending_update())?)
    }
}
