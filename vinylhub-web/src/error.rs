//! Error types for vinylhub-web
//!
//! Every error a handler can return renders as a flat JSON body
//! `{"error": "<message>"}`, except [`ApiError::Upstream`], which replays
//! the catalog's own status and JSON body unchanged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::spotify::SpotifyError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid bearer token (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// The catalog rejected a proxied request; its status and body are
    /// replayed to the client as-is
    #[error("Catalog returned error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The catalog could not be reached (502)
    #[error("{0}")]
    BadGateway(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// vinylhub-common error, including database failures (500)
    #[error("{0}")]
    Common(#[from] vinylhub_common::Error),
}

impl From<SpotifyError> for ApiError {
    fn from(err: SpotifyError) -> Self {
        match err {
            SpotifyError::Status { status, body } => ApiError::Upstream { status, body },
            SpotifyError::Network(msg) => ApiError::BadGateway(msg),
            SpotifyError::Parse(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            // Passthrough keeps the catalog's JSON body verbatim
            ApiError::Upstream { status, body } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                return (status, [("content-type", "application/json")], body).into_response();
            }
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Common(ref err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Tests
// ============================================================================
