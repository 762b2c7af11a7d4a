//! Integration tests for health check and general API functionality.
//!
//! Tests cover:
//! - Health check endpoint
//! - Root readiness message
//! - Empty store behavior

use axum::http::StatusCode;
use serde_json::json;

use super::common::{get, post_json, test_app};

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "ok");
    assert_eq!(response["metrics"]["durationsCount"], 0);
    assert_eq!(response["metrics"]["countsKeys"], 0);
}

#[tokio::test]
async fn test_health_check_after_ingest_and_rejection() {
    let (app, _state) = test_app();

    post_json(
        app.clone(),
        "/update-metrics",
        json!({"requestDurations": [0.1, 0.2, 0.3], "requestCounts": {"a": 1, "b": 2}}),
    )
    .await;
    post_json(app.clone(), "/update-metrics", json!([1, 2])).await;

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "ok");
    assert_eq!(response["metrics"]["durationsCount"], 3);
    assert_eq!(response["metrics"]["countsKeys"], 2);
    assert_eq!(response["metrics"]["totalRequests"], 3);
}

#[tokio::test]
async fn test_root_message() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Metrics server is running");
}

#[tokio::test]
async fn test_empty_store_returns_empty_results() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/custom-metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(response["metrics"]["requestDurations"]
        .as_array()
        .unwrap()
        .is_empty());
    assert!(response["metrics"]["requestCounts"]
        .as_object()
        .unwrap()
        .is_empty());
    assert!(response["metrics"]["lastUpdate"].is_null());
    assert!(response["serverTime"].is_string());
}
