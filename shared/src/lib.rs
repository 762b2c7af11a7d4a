//! StorePulse Shared Library
//!
//! This crate contains the types and building blocks shared by the metrics
//! relay and the clients that report to it.
//!
//! # Modules
//!
//! - [`models`] - Samples, update bodies and the relay's aggregate state
//! - [`storage`] - Aggregate store trait and the in-memory implementation
//! - [`exposition`] - Prometheus collectors and text rendering
//! - [`recorder`] - The record/flush/expose capability
//! - [`client`] - Buffering metrics client and relay health prober
//!
//! # Example
//!
//! ```
//! use shared::models::{MetricSample, MetricsUpdate};
//! use shared::storage::{AggregateStore, InMemoryAggregateStore};
//!
//! let store = InMemoryAggregateStore::new();
//! let update = MetricsUpdate::from_samples(&[MetricSample::new("GET", "/products", 200, 0.3)]);
//!
//! store.ingest(&update).unwrap();
//!
//! assert_eq!(store.snapshot().unwrap().request_counts["GET:/products"], 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod exposition;
pub mod models;
pub mod recorder;
pub mod storage;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;
