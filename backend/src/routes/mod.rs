//! Route definitions for the Todo API
//!
//! This module organizes all API routes and applies middleware.

use crate::auth::auth_middleware;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod auth;
mod health;
mod tasks;


pub use auth::auth_routes;
pub use tasks::task_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api", api_routes(&state))
        .fallback(route_not_found)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `/api` routes; everything under `/tasks` sits behind the auth gate
fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::auth_routes())
        .nest(
            "/tasks",
            tasks::task_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
}

/// Unknown paths still answer with the error envelope
async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
