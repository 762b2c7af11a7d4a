//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration tests,
//! including test app setup and HTTP request helpers.

use api::{create_router, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::net::SocketAddr;

/// Body limit used by test routers.
pub const TEST_BODY_LIMIT: usize = 1024 * 1024;

/// Creates a test router with a fresh in-memory store and registry.
///
/// # Returns
///
/// A tuple containing the configured router and the app state.
pub fn test_app() -> (Router, AppState) {
    let state = AppState::with_in_memory_store().unwrap();
    let router = create_router(state.clone(), TEST_BODY_LIMIT);
    (router, state)
}

/// Starts a relay on an ephemeral localhost port.
///
/// # Returns
///
/// The bound address and the relay's state.
pub async fn spawn_relay() -> (SocketAddr, AppState) {
    spawn_relay_with_limit(TEST_BODY_LIMIT).await
}

/// Starts a relay that rejects request bodies larger than `body_limit_bytes`.
pub async fn spawn_relay_with_limit(body_limit_bytes: usize) -> (SocketAddr, AppState) {
    let state = AppState::with_in_memory_store().unwrap();
    let router = create_router(state.clone(), body_limit_bytes);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (addr, state)
}

/// Helper to make a POST request with a raw body.
///
/// # Arguments
///
/// * `app` - The Axum router to send the request to
/// * `uri` - The URI path to POST to
/// * `body` - The body to send, labelled as JSON
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a POST request with JSON body.
pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, serde_json::to_string(&body).unwrap()).await
}

/// Helper to make a GET request and return the raw response text.
///
/// # Returns
///
/// The status code, the `content-type` header (if any) and the body.
pub async fn get_text(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    (
        status,
        content_type,
        String::from_utf8(body_bytes.to_vec()).unwrap(),
    )
}

/// Helper to make a GET request.
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get_text(app, uri).await;
    let json: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    (status, json)
}
