//! Metrics update data model.
//!
//! A `MetricsUpdate` is the body the instrumentation client posts to the
//! relay's `/update-metrics` endpoint. Every key is optional on the wire.

use super::sample::{MetricSample, SampleValidationError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// A batch of buffered metrics sent from a client to the relay.
///
/// # Example
///
/// ```
/// use shared::models::{MetricSample, MetricsUpdate};
///
/// let samples = vec![
///     MetricSample::new("GET", "/products", 200, 0.2),
///     MetricSample::new("GET", "/products", 500, 1.1),
/// ];
/// let update = MetricsUpdate::from_samples(&samples);
///
/// assert_eq!(update.request_durations, vec![0.2, 1.1]);
/// assert_eq!(update.request_counts["GET:/products"], 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsUpdate {
    /// Durations in seconds, appended to the relay's sequence in order.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub request_durations: Vec<f64>,

    /// Per-key request counts, summed into the relay's counts.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub request_counts: BTreeMap<String, u64>,

    /// Labelled samples fed into the relay's Prometheus collectors.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub samples: Vec<MetricSample>,
}

/// Errors that can occur when decoding or validating an update.
#[derive(Debug, Error)]
pub enum UpdateValidationError {
    /// The body is not a JSON object.
    #[error("Metrics update must be a JSON object")]
    NotAnObject,

    /// A known key holds a value of the wrong shape.
    #[error("Malformed metrics update: {0}")]
    Malformed(String),

    /// A duration is negative or not finite.
    #[error("Invalid duration at index {index}: {value}")]
    InvalidDuration {
        /// Position in `requestDurations`.
        index: usize,
        /// The rejected value.
        value: f64,
    },

    /// A sample failed validation.
    #[error("Invalid sample at index {index}: {source}")]
    InvalidSample {
        /// Position in `samples`.
        index: usize,
        /// Why the sample was rejected.
        source: SampleValidationError,
    },
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl MetricsUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an update from buffered samples.
    ///
    /// Durations keep the sample order, counts are summed per label key and
    /// the samples themselves are carried along for labelled exposition.
    #[must_use]
    pub fn from_samples(samples: &[MetricSample]) -> Self {
        let mut request_counts = BTreeMap::new();
        for sample in samples {
            *request_counts.entry(sample.label_key()).or_insert(0) += 1;
        }

        Self {
            request_durations: samples.iter().map(|s| s.duration_seconds).collect(),
            request_counts,
            samples: samples.to_vec(),
        }
    }

    /// Decodes an update from an already-parsed JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not an object, if a known key has
    /// the wrong shape, or if the decoded update fails validation.
    pub fn from_json(value: Value) -> Result<Self, UpdateValidationError> {
        if !value.is_object() {
            return Err(UpdateValidationError::NotAnObject);
        }

        let update: Self = serde_json::from_value(value)
            .map_err(|e| UpdateValidationError::Malformed(e.to_string()))?;
        update.validate_update()?;
        Ok(update)
    }

    /// Validates durations and samples.
    ///
    /// # Errors
    ///
    /// Returns the first invalid duration or sample found.
    pub fn validate_update(&self) -> Result<(), UpdateValidationError> {
        for (index, &value) in self.request_durations.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(UpdateValidationError::InvalidDuration { index, value });
            }
        }

        for (index, sample) in self.samples.iter().enumerate() {
            sample
                .validate_sample()
                .map_err(|source| UpdateValidationError::InvalidSample { index, source })?;
        }

        Ok(())
    }

    /// Returns true if the update carries no data at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.request_durations.is_empty() && self.request_counts.is_empty() && self.samples.is_empty()
    }
}
