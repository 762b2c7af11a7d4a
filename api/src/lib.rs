//! StorePulse Metrics Relay
//!
//! This crate provides the HTTP server that collects request metrics from
//! StorePulse clients, merges them into process-wide aggregate state and
//! exposes the result to Prometheus.
//!
//! # Architecture
//!
//! The relay is built on Axum and Tokio, providing:
//! - `POST /update-metrics` for batched client metrics
//! - `GET /metrics` in the Prometheus text exposition format
//! - `GET /custom-metrics` with the raw aggregate state as JSON
//! - `GET /health` and `GET /` liveness endpoints
//!
//! # Example
//!
//! ```no_run
//! use api::run_server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     run_server().await
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod error;
mod middleware;
mod routes;
mod state;

pub use config::{Config, LogFormat};
pub use error::ApiError;
pub use state::AppState;

use anyhow::Result;
use axum::{body::Body, http::StatusCode, response::IntoResponse, response::Response, Router};
use serde_json::json;
use std::any::Any;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Runs the relay.
///
/// This function initializes the server with configuration from environment variables
/// and starts listening for incoming connections. It handles graceful shutdown on
/// SIGTERM/SIGINT signals.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The server fails to bind to the configured address
/// - A fatal error occurs during operation
pub async fn run_server() -> Result<()> {
    let config = Config::from_env()?;
    run_server_with_config(config).await
}

/// Runs the relay with the provided configuration.
///
/// This is useful for testing or when you want to provide configuration programmatically.
///
/// # Errors
///
/// Returns an error if:
/// - The Prometheus collectors cannot be registered
/// - The server fails to bind to the configured address
/// - A fatal error occurs during operation
pub async fn run_server_with_config(config: Config) -> Result<()> {
    let addr = config.socket_addr()?;

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "StorePulse metrics relay starting"
    );

    let state = AppState::with_in_memory_store()?;
    let app = create_router(state, config.body_limit_bytes);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        metrics = %format!("http://{addr}/metrics"),
        custom_metrics = %format!("http://{addr}/custom-metrics"),
        health = %format!("http://{addr}/health"),
        "Listening for connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Creates the main application router with all routes and middleware.
///
/// This function is public to allow testing the router without starting a full server.
pub fn create_router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(routes::index_routes())
        .merge(routes::health_routes(state.clone()))
        .merge(routes::metrics_routes(state.clone()))
        .fallback(routes::not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::track_requests,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
}

/// Turns a handler panic into a 500 response instead of dropping the connection.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %message, "Unhandled error in request handler");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(json!({
            "success": false,
            "error": "Internal server error",
            "message": message,
        })),
    )
        .into_response()
}

/// Waits for a shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
