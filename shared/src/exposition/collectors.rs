//! HTTP request collectors and text rendering.

use crate::models::MetricSample;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use thiserror::Error;

/// Content type of the Prometheus text exposition format.
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Histogram bucket upper bounds, in seconds.
pub const DURATION_BUCKETS: [f64; 8] = [0.1, 0.5, 1.0, 1.5, 2.0, 3.0, 5.0, 10.0];

/// Labels attached to both request collectors.
pub const LABEL_NAMES: [&str; 3] = ["method", "route", "status"];

const DURATION_METRIC: &str = "http_request_duration_seconds";
const TOTAL_METRIC: &str = "http_request_total";

/// Errors that can occur while building or rendering the registry.
#[derive(Debug, Error)]
pub enum ExpositionError {
    /// A collector could not be created or registered.
    #[error("Failed to register collector: {0}")]
    Registration(#[source] prometheus::Error),

    /// The registry could not be encoded.
    #[error("Failed to encode metrics: {0}")]
    Encoding(#[source] prometheus::Error),

    /// The encoder produced bytes that are not UTF-8.
    #[error("Encoded metrics are not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Request duration histogram and request counter on a private registry.
///
/// Cloning is cheap and every clone observes into the same registry.
#[derive(Clone)]
pub struct HttpCollectors {
    registry: Registry,
    durations: HistogramVec,
    totals: IntCounterVec,
}

impl HttpCollectors {
    /// Creates the collectors and registers them, along with the process
    /// collector on Linux, on a fresh registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a collector cannot be registered.
    pub fn new() -> Result<Self, ExpositionError> {
        let registry = Registry::new();

        let durations = HistogramVec::new(
            HistogramOpts::new(DURATION_METRIC, "Duration of HTTP requests in seconds")
                .buckets(DURATION_BUCKETS.to_vec()),
            &LABEL_NAMES,
        )
        .map_err(ExpositionError::Registration)?;

        let totals = IntCounterVec::new(
            Opts::new(TOTAL_METRIC, "Total number of HTTP requests"),
            &LABEL_NAMES,
        )
        .map_err(ExpositionError::Registration)?;

        registry
            .register(Box::new(durations.clone()))
            .map_err(ExpositionError::Registration)?;
        registry
            .register(Box::new(totals.clone()))
            .map_err(ExpositionError::Registration)?;

        #[cfg(target_os = "linux")]
        registry
            .register(Box::new(
                prometheus::process_collector::ProcessCollector::for_self(),
            ))
            .map_err(ExpositionError::Registration)?;

        Ok(Self {
            registry,
            durations,
            totals,
        })
    }

    /// Observes one request.
    pub fn observe(&self, method: &str, route: &str, status: &str, duration_seconds: f64) {
        let labels = [method, route, status];
        self.durations
            .with_label_values(&labels)
            .observe(duration_seconds);
        self.totals.with_label_values(&labels).inc();
    }

    /// Observes a client-submitted sample.
    pub fn observe_sample(&self, sample: &MetricSample) {
        self.observe(
            &sample.method,
            &sample.route,
            &sample.status_label(),
            sample.duration_seconds,
        );
    }

    /// Renders every registered metric in the text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn render(&self) -> Result<String, ExpositionError> {
        let families = self.registry.gather();
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&families, &mut buf)
            .map_err(ExpositionError::Encoding)?;
        Ok(String::from_utf8(buf)?)
    }
}
