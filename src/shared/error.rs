//! Application Error Types
//!
//! Centralized error handling with Axum integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error("Not authenticated: join a room first")]
    NotAuthenticated,

    #[error("Target user not found: {0}")]
    TargetNotFound(String),

    #[error("Malformed control message: {0}")]
    MalformedControlMessage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable wire code carried in `error` events.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::DuplicateUsername(_) => "duplicate_username",
            AppError::NotAuthenticated => "not_authenticated",
            AppError::TargetNotFound(_) => "target_not_found",
            AppError::MalformedControlMessage(_) => "malformed_control_message",
            AppError::NotFound(_) => "not_found",
            AppError::Internal(_) => "internal_error",
        }
    }
}

/// Error response body for the HTTP surface
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) | AppError::TargetNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::MalformedControlMessage(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::DuplicateUsername(_) => StatusCode::CONFLICT,
            AppError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AppError::Validation("x".into()).code(), "validation_error");
        assert_eq!(
            AppError::DuplicateUsername("bob".into()).code(),
            "duplicate_username"
        );
        assert_eq!(AppError::NotAuthenticated.code(), "not_authenticated");
        assert_eq!(
            AppError::TargetNotFound("bob".into()).code(),
            "target_not_found"
        );
        assert_eq!(
            AppError::MalformedControlMessage("bad json".into()).code(),
            "malformed_control_message"
        );
    }

    #[test]
    fn test_error_display_includes_detail() {
        let err = AppError::TargetNotFound("alice".into());
        assert_eq!(err.to_string(), "Target user not found: alice");
    }
}
