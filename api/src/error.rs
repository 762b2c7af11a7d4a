//! API error type and its HTTP mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shared::models::UpdateValidationError;
use shared::recorder::RecorderError;
use shared::storage::AggregateStoreError;
use thiserror::Error;

/// Errors returned by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body is not a valid metrics update.
    #[error("{0}")]
    Validation(String),

    /// The request body exceeds the configured limit.
    #[error("request body too large")]
    PayloadTooLarge,

    /// The Prometheus registry could not be rendered.
    #[error("failed to render metrics: {0}")]
    Serialization(String),

    /// No route matches the request.
    #[error("no route for {0}")]
    NotFound(String),

    /// Anything else that went wrong while handling the request.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Short, stable description placed in the `error` field.
    #[must_use]
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Invalid metrics format",
            Self::PayloadTooLarge => "Payload too large",
            Self::Serialization(_) => "Error collecting metrics",
            Self::NotFound(_) => "Not found",
            Self::Internal(_) => "Internal server error",
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Serialization(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        let body = Json(json!({
            "success": false,
            "error": self.client_message(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::Validation(rejection.body_text())
        }
    }
}

impl From<UpdateValidationError> for ApiError {
    fn from(e: UpdateValidationError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<AggregateStoreError> for ApiError {
    fn from(e: AggregateStoreError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<RecorderError> for ApiError {
    fn from(e: RecorderError) -> Self {
        Self::Serialization(e.to_string())
    }
}
