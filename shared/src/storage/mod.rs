//! Storage traits and implementations.
//!
//! This module provides the abstraction over the relay's aggregate state.
//! The `AggregateStore` trait defines the interface, allowing the in-memory
//! implementation to be swapped out without touching the route handlers.

pub mod aggregate_store;

pub use aggregate_store::{AggregateStore, AggregateStoreError, InMemoryAggregateStore};
