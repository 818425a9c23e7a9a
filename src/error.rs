// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
///
/// Read paths (status, questions, leaderboard) never return `StorageUnavailable`;
/// the engine swallows storage failures there and answers with a neutral default.
#[derive(Debug, Error)]
pub enum AppError {
    // 409 Conflict: the operation needs a round that is not set (or not accepting entries)
    #[error("No active round")]
    NoActiveRound,

    // 400 Bad Request
    #[error("Invalid round: {0}")]
    InvalidRound(i32),

    // 400 Bad Request
    #[error("{0}")]
    BadRequest(String),

    // 409 Conflict (e.g., submit after terminal disqualification)
    #[error("{0}")]
    Conflict(String),

    // 503 Service Unavailable
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    // 500 Internal Server Error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NoActiveRound => (StatusCode::CONFLICT, self.to_string()),
            AppError::InvalidRound(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::StorageUnavailable(msg) => {
                tracing::error!("Storage unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage unavailable".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Any persistence failure on a write path surfaces as 503.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
