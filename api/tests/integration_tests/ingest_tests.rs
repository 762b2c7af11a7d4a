//! Integration tests for metrics ingestion.
//!
//! Tests cover:
//! - Sequential ingests keep every duration
//! - Malformed bodies are rejected without touching state
//! - Per-key count summation, including under concurrency
//! - Empty updates only move `lastUpdate`

use axum::http::StatusCode;
use serde_json::json;
use shared::models::AggregateState;
use shared::storage::AggregateStore;

use super::common::{get, post_json, post_raw, test_app};

#[tokio::test]
async fn test_sequential_ingests_keep_all_durations() {
    let (app, state) = test_app();
    let n = 5;
    let k = 3;

    for i in 0..n {
        let durations: Vec<f64> = (0..k).map(|j| f64::from(i * 10 + j) / 100.0).collect();
        let (status, response) = post_json(
            app.clone(),
            "/update-metrics",
            json!({ "requestDurations": durations }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["success"], true);
        assert_eq!(response["message"], "Metrics updated successfully");
    }

    let snapshot = state.store().snapshot().unwrap();
    assert_eq!(snapshot.request_durations.len(), (n * k) as usize);
}

#[tokio::test]
async fn test_malformed_bodies_are_rejected() {
    let (app, state) = test_app();

    for body in ["null", "[1, 2, 3]", "\"text\"", "42", "{oops", ""] {
        let (status, response) = post_raw(app.clone(), "/update-metrics", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(response["error"], "Invalid metrics format");
        assert_eq!(response["success"], false);
    }

    assert_eq!(state.store().snapshot().unwrap(), AggregateState::new());
}

#[tokio::test]
async fn test_mistyped_fields_are_rejected() {
    let (app, state) = test_app();

    let bodies = [
        json!({"requestDurations": "slow"}),
        json!({"requestDurations": [0.1, -2.0]}),
        json!({"requestCounts": {"GET:/products": "many"}}),
        json!({"requestCounts": [1, 2]}),
        json!({"samples": [{"method": "GET"}]}),
    ];

    for body in bodies {
        let (status, _) = post_json(app.clone(), "/update-metrics", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
    }

    assert_eq!(state.store().snapshot().unwrap(), AggregateState::new());
}

#[tokio::test]
async fn test_counts_round_trip_through_custom_metrics() {
    let (app, _state) = test_app();

    let (status, _) = post_json(
        app.clone(),
        "/update-metrics",
        json!({"requestCounts": {"GET:/products": 3}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, response) = get(app, "/custom-metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["metrics"]["requestCounts"]["GET:/products"], 3);
    assert!(response["metrics"]["lastUpdate"].is_string());
}

#[tokio::test]
async fn test_counts_are_summed_not_overwritten() {
    let (app, _state) = test_app();

    for count in [3, 4] {
        post_json(
            app.clone(),
            "/update-metrics",
            json!({"requestCounts": {"GET:/products": count, "GET:/products/:id": 1}}),
        )
        .await;
    }

    let (_, response) = get(app, "/custom-metrics").await;
    assert_eq!(response["metrics"]["requestCounts"]["GET:/products"], 7);
    assert_eq!(response["metrics"]["requestCounts"]["GET:/products/:id"], 2);
}

#[tokio::test]
async fn test_empty_update_only_sets_last_update() {
    let (app, state) = test_app();

    post_json(
        app.clone(),
        "/update-metrics",
        json!({"requestDurations": [0.5], "requestCounts": {"GET:/products": 1}}),
    )
    .await;
    let before = state.store().snapshot().unwrap();

    let (status, response) = post_json(app, "/update-metrics", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], true);

    let after = state.store().snapshot().unwrap();
    assert_eq!(after.request_durations, before.request_durations);
    assert_eq!(after.request_counts, before.request_counts);
    assert!(after.last_update >= before.last_update);
    assert_eq!(
        response["timestamp"],
        serde_json::to_value(after.last_update.unwrap()).unwrap()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ingests_do_not_lose_increments() {
    let (app, state) = test_app();
    let m = 64;

    let tasks: Vec<_> = (0..m)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                post_json(
                    app,
                    "/update-metrics",
                    json!({"requestCounts": {"GET:/products": 1}, "requestDurations": [0.1]}),
                )
                .await
            })
        })
        .collect();

    for task in tasks {
        let (status, _) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    let snapshot = state.store().snapshot().unwrap();
    assert_eq!(snapshot.request_counts["GET:/products"], m);
    assert_eq!(snapshot.request_durations.len(), m as usize);
}
