//! Readiness banner at `/`.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// Root response.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    /// Fixed readiness message.
    pub message: &'static str,
}

/// Creates the root route.
pub fn index_routes() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Json<IndexResponse> {
    tracing::info!("Home route accessed");
    Json(IndexResponse {
        message: "Metrics server is running",
    })
}
