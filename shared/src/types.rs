//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Token type advertised to clients in the login response
pub const BEARER_TOKEN_TYPE: &str = "Bearer";

// ============================================================================
// Response Envelope
// ============================================================================

/// Outcome marker of the response envelope
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Envelope wrapping every API response: `{status, message, data | error}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying a payload
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Error response; the top-level message mirrors the detail message
    pub fn error(detail: ErrorDetail) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: detail.message.clone(),
            data: None,
            error: Some(detail),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

impl ApiResponse<()> {
    /// Successful response with a message only (no `data` field)
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: None,
            error: None,
        }
    }
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Authentication Types
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "first name is required (max 100 characters)"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "last name is required (max 100 characters)"))]
    pub last_name: String,

    #[validate(
        email(message = "a valid email is required"),
        length(max = 255, message = "email cannot exceed 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 1, max = 32, message = "phone is required (max 32 characters)"))]
    pub phone: String,

    #[validate(length(min = 8, max = 128, message = "password must be between 8 and 128 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(email(message = "a valid email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Non-sensitive view of a user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Login response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserSummary,
}

// ============================================================================
// Task Types
// ============================================================================

/// Create task request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 100, message = "title is required (max 100 characters)"))]
    pub title: String,

    #[validate(length(max = 500, message = "description cannot exceed 500 characters"))]
    pub description: String,
}

/// Partial task update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "title must be between 1 and 100 characters"))]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "description cannot exceed 500 characters"))]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

impl UpdateTaskRequest {
    /// True when the request would not change anything
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

/// Task response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: bool,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
