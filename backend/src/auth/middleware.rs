//! Authentication middleware
//!
//! Gate for protected routes: requires `Authorization: Bearer <token>`,
//! verifies the token and puts the caller's identity into the request
//! extensions. Every rejection is a plain `401 Unauthorized`; the failure
//! kind only goes to the logs.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use todo_shared::errors::AuthError;
use tracing::debug;
use uuid::Uuid;

/// Authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Extract the token from a header value of exact shape `Bearer <token>`
pub fn parse_bearer(header_value: &str) -> Result<&str, AuthError> {
    match header_value.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() && !token.contains(' ') => Ok(token),
        _ => Err(AuthError::InvalidHeaderFormat),
    }
}

/// Run the full header → token → identity check
pub fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<AuthUser, AuthError> {
    let header_value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeaderFormat)?;

    let token = parse_bearer(header_value)?;
    let user_id = state.jwt().verify_now(token)?;

    Ok(AuthUser { user_id })
}

fn reject(kind: AuthError) -> ApiError {
    debug!(reason = kind.kind(), "Request rejected by auth gate");
    ApiError::Unauthorized("Unauthorized".to_string())
}

/// Route layer for groups of protected routes
///
/// Apply with `axum::middleware::from_fn_with_state`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = authenticate(request.headers(), &state).map_err(reject)?;
    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Extractor for handlers that need the caller's identity
///
/// Reuses the identity placed by [`auth_middleware`] when the route sits
/// behind it, otherwise authenticates the request itself.
#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_user) = parts.extensions.get::<AuthUser>() {
            return Ok(*auth_user);
        }

        let app_state = AppState::from_ref(state);
        authenticate(&parts.headers, &app_state).map_err(reject)
    }
}
