//! Data models for the StorePulse metrics pipeline.
//!
//! This module contains the sample produced by the instrumentation client,
//! the update body it posts, and the relay's aggregate state.

pub mod aggregate;
pub mod sample;
pub mod update;

pub use aggregate::{AggregateState, AggregateStats};
pub use sample::{MetricSample, SampleValidationError};
pub use update::{MetricsUpdate, UpdateValidationError};
