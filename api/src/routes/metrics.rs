//! Metrics ingestion and exposition endpoints.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::exposition::CONTENT_TYPE;
use shared::models::{AggregateState, MetricsUpdate};
use shared::recorder::Recorder;

/// Response for a successful metrics update.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateMetricsResponse {
    /// Always true.
    pub success: bool,
    /// Confirmation text.
    pub message: String,
    /// The new `lastUpdate` of the aggregate state.
    pub timestamp: DateTime<Utc>,
}

/// Raw JSON view of the aggregate state.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMetricsResponse {
    /// The merged client metrics.
    pub metrics: AggregateState,
    /// Server time of the read.
    pub server_time: DateTime<Utc>,
}

/// Creates the metrics routes.
pub fn metrics_routes(state: AppState) -> Router {
    Router::new()
        .route("/update-metrics", post(update_metrics))
        .route("/metrics", get(prometheus_metrics))
        .route("/custom-metrics", get(custom_metrics))
        .with_state(state)
}

async fn update_metrics(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateMetricsResponse>, ApiError> {
    let Json(body) = payload?;
    let update = MetricsUpdate::from_json(body)?;

    if update.is_empty() {
        tracing::debug!("Metrics update carries no data, refreshing lastUpdate only");
    }

    tracing::info!(
        durations = update.request_durations.len(),
        count_keys = update.request_counts.len(),
        samples = update.samples.len(),
        "Received metrics update"
    );

    let timestamp = state.store().ingest(&update)?;

    for sample in update.samples {
        state.recorder().record_sample(sample);
    }

    Ok(Json(UpdateMetricsResponse {
        success: true,
        message: "Metrics updated successfully".to_string(),
        timestamp,
    }))
}

async fn prometheus_metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!("Prometheus metrics requested");
    let body = state.recorder().expose()?;
    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], body))
}

async fn custom_metrics(
    State(state): State<AppState>,
) -> Result<Json<CustomMetricsResponse>, ApiError> {
    tracing::debug!("Custom metrics requested");
    Ok(Json(CustomMetricsResponse {
        metrics: state.store().snapshot()?,
        server_time: Utc::now(),
    }))
}
