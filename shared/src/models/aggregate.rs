//! Aggregate state data model.
//!
//! `AggregateState` is the relay's process-wide view of everything clients
//! have submitted. It is owned by an [`AggregateStore`](crate::storage::AggregateStore)
//! and handed out as a snapshot for reads.

use super::update::MetricsUpdate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Merged metrics received by the relay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateState {
    /// Every duration ever ingested, in arrival order.
    pub request_durations: Vec<f64>,

    /// Request counts keyed by label key (e.g. `GET:/products`).
    pub request_counts: BTreeMap<String, u64>,

    /// When the last ingest happened, `None` before the first one.
    pub last_update: Option<DateTime<Utc>>,
}

/// Size summary of the aggregate state, reported by the health endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Number of stored durations.
    pub durations_count: usize,
    /// Number of distinct count keys.
    pub counts_keys: usize,
    /// Sum of all counts.
    pub total_requests: u64,
}

impl AggregateState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges an update into this state.
    ///
    /// Durations are appended, counts are summed per key (saturating) and
    /// `last_update` is set to `now` even when the update is empty.
    pub fn merge(&mut self, update: &MetricsUpdate, now: DateTime<Utc>) {
        self.request_durations
            .extend_from_slice(&update.request_durations);

        for (key, count) in &update.request_counts {
            let entry = self.request_counts.entry(key.clone()).or_insert(0);
            *entry = entry.saturating_add(*count);
        }

        self.last_update = Some(now);
    }

    /// Returns the size summary of this state.
    #[must_use]
    pub fn stats(&self) -> AggregateStats {
        AggregateStats {
            durations_count: self.request_durations.len(),
            counts_keys: self.request_counts.len(),
            total_requests: self.total_requests(),
        }
    }

    /// Returns the sum of all counts, saturating at `u64::MAX`.
    #[must_use]
    pub fn total_requests(&self) -> u64 {
        self.request_counts
            .values()
            .fold(0, |total, count| total.saturating_add(*count))
    }
}
