//! Integration tests for the Prometheus `/metrics` endpoint.
//!
//! Tests cover:
//! - Content type and parseability with and without prior traffic
//! - Relay requests labelled by route template
//! - Client samples labelled as submitted

use axum::http::StatusCode;
use serde_json::json;

use super::common::{get, get_text, post_json, test_app};

fn is_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == ':')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn is_sample_value(value: &str) -> bool {
    matches!(value, "+Inf" | "-Inf" | "NaN") || value.parse::<f64>().is_ok()
}

/// Checks every line against the text exposition grammar.
fn assert_valid_exposition(text: &str) {
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        if let Some(comment) = line.strip_prefix("# ") {
            let mut parts = comment.splitn(3, ' ');
            let keyword = parts.next().unwrap();
            if keyword == "HELP" || keyword == "TYPE" {
                let name = parts.next().unwrap_or_default();
                assert!(is_metric_name(name), "bad name in comment: {line}");
            }
            if keyword == "TYPE" {
                let kind = parts.next().unwrap_or_default();
                assert!(
                    ["counter", "gauge", "histogram", "summary", "untyped"].contains(&kind),
                    "bad type: {line}"
                );
            }
            continue;
        }

        let (series, value) = match line.find('}') {
            Some(end) => {
                let open = line.find('{').expect("label block without '{'");
                let labels = &line[open + 1..end];
                for pair in labels.split("\",").filter(|p| !p.is_empty()) {
                    let (key, val) = pair.split_once("=\"").expect("label without =\"");
                    assert!(is_metric_name(key), "bad label name: {line}");
                    assert!(!val.contains('\n'));
                }
                (&line[..open], line[end + 1..].trim())
            }
            None => {
                let (series, value) = line.split_once(' ').expect("sample without value");
                (series, value.trim())
            }
        };

        assert!(is_metric_name(series), "bad metric name: {line}");
        let value = value.split(' ').next().unwrap();
        assert!(is_sample_value(value), "bad value: {line}");
    }
}

#[tokio::test]
async fn test_metrics_parseable_before_any_ingest() {
    let (app, _state) = test_app();

    let (status, content_type, body) = get_text(app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/plain; version=0.0.4"));
    assert_valid_exposition(&body);
}

#[tokio::test]
async fn test_relay_requests_are_counted_by_route() {
    let (app, _state) = test_app();

    let (status, _) = get(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    post_json(app.clone(), "/update-metrics", json!([1])).await;

    let (_, _, body) = get_text(app, "/metrics").await;

    assert_valid_exposition(&body);
    assert!(body.contains(r#"http_request_total{method="GET",route="/health",status="200"} 1"#));
    assert!(body.contains(
        r#"http_request_total{method="POST",route="/update-metrics",status="400"} 1"#
    ));
    assert!(body.contains("# TYPE http_request_duration_seconds histogram"));
}

#[tokio::test]
async fn test_client_samples_are_exposed_with_labels() {
    let (app, _state) = test_app();

    let (status, _) = post_json(
        app.clone(),
        "/update-metrics",
        json!({
            "requestDurations": [1.2, 0.3],
            "requestCounts": {"GET:/products": 1, "GET:/products/:id": 1},
            "samples": [
                {"method": "GET", "route": "/products", "statusCode": 200, "durationSeconds": 1.2},
                {"method": "GET", "route": "/products/:id", "statusCode": 404, "durationSeconds": 0.3}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, body) = get_text(app, "/metrics").await;

    assert_valid_exposition(&body);
    assert!(body.contains(r#"http_request_total{method="GET",route="/products",status="200"} 1"#));
    assert!(body.contains(
        r#"http_request_duration_seconds_bucket{method="GET",route="/products",status="200",le="1.5"} 1"#
    ));
    assert!(body.contains(
        r#"http_request_duration_seconds_bucket{method="GET",route="/products",status="200",le="1"} 0"#
    ));
    assert!(body.contains(
        r#"http_request_total{method="GET",route="/products/:id",status="404"} 1"#
    ));
}

#[tokio::test]
async fn test_unknown_routes_share_one_label() {
    let (app, _state) = test_app();

    get(app.clone(), "/does-not-exist").await;
    get(app.clone(), "/also-missing").await;

    let (_, _, body) = get_text(app, "/metrics").await;
    assert!(body.contains(r#"http_request_total{method="GET",route="unmatched",status="404"} 2"#));
}
