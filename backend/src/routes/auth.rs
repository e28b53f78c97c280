//! Authentication routes
//!
//! Provides endpoints for user registration, login and the current identity.
//!
//! Password hashing and verification run on the blocking thread pool; the
//! JWT keys come pre-computed from `AppState`.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use todo_shared::types::{ApiResponse, LoginRequest, LoginResponse, RegisterRequest, UserSummary};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

/// POST /api/auth/register
///
/// Creates the identity only; the client logs in separately.
async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<()>>)> {
    UserService::register(state.users(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("User registered successfully")),
    ))
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let response = UserService::login(state.users(), state.jwt(), req, Utc::now()).await?;
    Ok(Json(ApiResponse::success("Login successful", response)))
}

/// GET /api/auth/me
///
/// Requires a valid Bearer token; authenticated by the `AuthUser` extractor.
async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<UserSummary>>> {
    let user = UserService::current_user(state.users(), auth.user_id).await?;
    Ok(Json(ApiResponse::success("User retrieved successfully", user)))
}
