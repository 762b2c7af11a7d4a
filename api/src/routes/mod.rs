//! API route definitions.
//!
//! This module organizes all HTTP routes for the StorePulse metrics relay.

mod health;
mod index;
mod metrics;

pub use health::health_routes;
pub use index::index_routes;
pub use metrics::metrics_routes;

use crate::error::ApiError;
use axum::http::Uri;

/// Fallback for requests that match no route.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_owned())
}
