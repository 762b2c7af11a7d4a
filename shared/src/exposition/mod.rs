//! Prometheus exposition.
//!
//! Owns the registry behind the relay's `/metrics` endpoint: the HTTP
//! request histogram and counter, plus process metrics on Linux.

pub mod collectors;

pub use collectors::{
    ExpositionError, HttpCollectors, CONTENT_TYPE, DURATION_BUCKETS, LABEL_NAMES,
};
