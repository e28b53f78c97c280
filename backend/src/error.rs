//! Application error handling
//!
//! Every handler returns [`ApiResult`]. Errors are converted into the
//! `{status: "error", message, error: {code, message, field}}` envelope;
//! internal causes are logged and never sent to the client.

use crate::repositories::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use todo_shared::types::{ApiResponse, ErrorDetail};
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid task ID")]
    InvalidTaskId,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Login failure; identical for unknown email and wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Task not found")]
    TaskNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("User with this email already exists")]
    UserExists,

    #[error("Token generation failed")]
    TokenGeneration(#[source] anyhow::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Storage error")]
    Storage(#[from] StoreError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// HTTP status, stable error code and client-facing message
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Validation { message, .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message.clone())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone()),
            ApiError::InvalidTaskId => (
                StatusCode::BAD_REQUEST,
                "INVALID_TASK_ID",
                "Invalid task ID".to_string(),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password".to_string(),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::TaskNotFound => (
                StatusCode::NOT_FOUND,
                "TASK_NOT_FOUND",
                "Task not found".to_string(),
            ),
            ApiError::UserNotFound => (
                StatusCode::NOT_FOUND,
                "USER_NOT_FOUND",
                "User not found".to_string(),
            ),
            ApiError::UserExists => (
                StatusCode::CONFLICT,
                "USER_EXISTS",
                "User with this email already exists".to_string(),
            ),
            ApiError::TokenGeneration(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "TOKEN_GENERATION_FAILED",
                "Failed to generate access token".to_string(),
            ),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
            ApiError::Storage(StoreError::NotFound) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            ),
            ApiError::Storage(StoreError::Conflict(_)) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                "Resource already exists".to_string(),
            ),
            ApiError::Storage(StoreError::Database(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "A database error occurred".to_string(),
            ),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.parts().0
    }

    pub fn code(&self) -> &'static str {
        self.parts().1
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        match &self {
            ApiError::TokenGeneration(err) | ApiError::Internal(err) => {
                error!(code, "Internal error: {:?}", err);
            }
            ApiError::Storage(StoreError::Database(err)) => {
                error!(code, "Database error: {:?}", err);
            }
            _ => {}
        }

        let field = match self {
            ApiError::Validation { field, .. } => field,
            _ => None,
        };

        let body = Json(ApiResponse::<()>::error(ErrorDetail {
            code: code.to_string(),
            message,
            field,
        }));

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
