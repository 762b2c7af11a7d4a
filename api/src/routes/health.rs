//! Health check endpoint.
//!
//! Liveness stub for load balancers and the client-side health prober. It
//! always answers 200 and reports how much aggregate state the relay holds.

use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::models::AggregateStats;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status (always "ok" if reachable).
    pub status: &'static str,
    /// Server time of the check.
    pub timestamp: DateTime<Utc>,
    /// Size of the aggregate state.
    pub metrics: AggregateStats,
}

/// Creates the health check routes.
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let metrics = state.store().stats().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to read aggregate stats");
        AggregateStats::default()
    });

    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        metrics,
    })
}
