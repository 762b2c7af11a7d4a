//! Metric sample data model.
//!
//! A `MetricSample` describes one completed outbound call: which endpoint was
//! hit, how it ended and how long it took.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// One observed request, produced by the instrumentation client.
///
/// # Example
///
/// ```
/// use shared::models::MetricSample;
///
/// let sample = MetricSample::new("get", "/products", 200, 0.42);
///
/// assert_eq!(sample.method, "GET");
/// assert_eq!(sample.label_key(), "GET:/products");
/// assert!(sample.validate_sample().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    /// HTTP method, upper-cased (e.g. "GET").
    #[validate(length(min = 1, message = "Method cannot be empty"))]
    pub method: String,

    /// Route template of the call (e.g. "/products/:id").
    #[validate(length(min = 1, message = "Route cannot be empty"))]
    pub route: String,

    /// Response status, or 500 when the call failed before a response.
    #[validate(range(min = 100, max = 599, message = "Status code out of range"))]
    pub status_code: u16,

    /// Wall-clock duration of the call in seconds.
    #[validate(range(min = 0.0, message = "Duration cannot be negative"))]
    pub duration_seconds: f64,
}

/// Errors that can occur during sample validation.
#[derive(Debug, Error)]
pub enum SampleValidationError {
    /// The duration is NaN or infinite.
    #[error("Duration must be a finite number")]
    NonFiniteDuration,

    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

impl MetricSample {
    /// Creates a new sample. The method is normalized to upper case.
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        route: impl Into<String>,
        status_code: u16,
        duration_seconds: f64,
    ) -> Self {
        Self {
            method: method.into().to_uppercase(),
            route: route.into(),
            status_code,
            duration_seconds,
        }
    }

    /// Returns the key under which this sample is counted (`METHOD:route`).
    #[must_use]
    pub fn label_key(&self) -> String {
        format!("{}:{}", self.method, self.route)
    }

    /// Returns the status code as a Prometheus label value.
    #[must_use]
    pub fn status_label(&self) -> String {
        self.status_code.to_string()
    }

    /// Validates the sample.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The duration is not finite or is negative
    /// - The method or route is empty
    /// - The status code is outside 100..=599
    pub fn validate_sample(&self) -> Result<(), SampleValidationError> {
        if !self.duration_seconds.is_finite() {
            return Err(SampleValidationError::NonFiniteDuration);
        }
        self.validate()?;
        Ok(())
    }
}
