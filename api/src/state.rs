//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use shared::exposition::{ExpositionError, HttpCollectors};
use shared::recorder::InProcessRecorder;
use shared::storage::{AggregateStore, InMemoryAggregateStore};
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// Built once at startup and cloned into every handler; all clones share
/// the same aggregate store and Prometheus registry.
#[derive(Clone)]
pub struct AppState {
    /// Merged client metrics.
    store: Arc<dyn AggregateStore>,
    /// Prometheus collectors for `/metrics`.
    recorder: InProcessRecorder,
}

impl AppState {
    /// Creates a new application state from a store and a set of collectors.
    pub fn new(store: Arc<dyn AggregateStore>, collectors: HttpCollectors) -> Self {
        Self {
            store,
            recorder: InProcessRecorder::new(collectors),
        }
    }

    /// Creates a new application state with an empty in-memory store and a
    /// fresh Prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the collectors cannot be registered.
    pub fn with_in_memory_store() -> Result<Self, ExpositionError> {
        Ok(Self::new(
            Arc::new(InMemoryAggregateStore::new()),
            HttpCollectors::new()?,
        ))
    }

    /// Returns a reference to the aggregate store.
    #[must_use]
    pub fn store(&self) -> &dyn AggregateStore {
        self.store.as_ref()
    }

    /// Returns the relay's in-process recorder.
    #[must_use]
    pub fn recorder(&self) -> &InProcessRecorder {
        &self.recorder
    }
}
