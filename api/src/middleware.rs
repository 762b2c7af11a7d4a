//! Request tracking middleware.

use crate::state::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use shared::recorder::Recorder;
use std::time::Instant;

/// Route label used for requests that hit the fallback.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Logs each request on entry and exit and observes it into the relay's
/// request histogram and counter, labelled by the matched route template.
pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_ROUTE.to_owned(), |p| p.as_str().to_owned());

    tracing::debug!(%method, %path, "Request started");

    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = start.elapsed();
    let status = response.status().as_u16();

    state
        .recorder()
        .record(method.as_str(), &route, status, elapsed.as_secs_f64());

    tracing::info!(
        %method,
        %path,
        status,
        duration_ms = elapsed.as_secs_f64() * 1000.0,
        "Request completed"
    );

    response
}
