//! Error types for the Todo service

use thiserror::Error;

/// Authentication failure kinds
///
/// These are logged server-side; callers only ever see a generic
/// `401 Unauthorized` (or `INVALID_CREDENTIALS` for login).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Missing token")]
    MissingToken,

    #[error("Invalid authorization header format")]
    InvalidHeaderFormat,
}

impl AuthError {
    /// Stable identifier used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::TokenExpired => "token_expired",
            AuthError::MalformedToken => "malformed_token",
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidHeaderFormat => "invalid_header_format",
        }
    }
}
