//! Aggregate store trait and implementations.
//!
//! Provides the `AggregateStore` trait for abstracting the relay's merged
//! metric state and an `InMemoryAggregateStore` that keeps it for the
//! lifetime of the process.

use crate::models::{AggregateState, AggregateStats, MetricsUpdate};
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors that can occur during aggregate store operations.
#[derive(Debug, Error)]
pub enum AggregateStoreError {
    /// Failed to acquire lock on the store.
    #[error("Failed to acquire lock on aggregate store")]
    LockError,
}

/// Trait for aggregate state storage.
///
/// Implementations must be thread-safe (Send + Sync) and must apply each
/// ingest atomically: a concurrent reader sees either none or all of it.
pub trait AggregateStore: Send + Sync {
    /// Merges an update into the state and returns the new `lastUpdate`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn ingest(&self, update: &MetricsUpdate) -> Result<DateTime<Utc>, AggregateStoreError>;

    /// Returns a copy of the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn snapshot(&self) -> Result<AggregateState, AggregateStoreError>;

    /// Returns the size summary of the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn stats(&self) -> Result<AggregateStats, AggregateStoreError>;
}

/// In-memory aggregate store implementation.
#[derive(Debug, Default)]
pub struct InMemoryAggregateStore {
    state: Arc<RwLock<AggregateState>>,
}

impl InMemoryAggregateStore {
    /// Creates a new empty in-memory aggregate store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(AggregateState::new())),
        }
    }

    /// Creates a new in-memory aggregate store wrapped in an Arc.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl AggregateStore for InMemoryAggregateStore {
    fn ingest(&self, update: &MetricsUpdate) -> Result<DateTime<Utc>, AggregateStoreError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| AggregateStoreError::LockError)?;
        let now = Utc::now();
        state.merge(update, now);
        Ok(now)
    }

    fn snapshot(&self) -> Result<AggregateState, AggregateStoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| AggregateStoreError::LockError)?;
        Ok(state.clone())
    }

    fn stats(&self) -> Result<AggregateStats, AggregateStoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| AggregateStoreError::LockError)?;
        Ok(state.stats())
    }
}
