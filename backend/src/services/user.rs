//! User service for registration, login and identity lookup
//!
//! - Password hashing/verification runs on the blocking thread pool
//! - Login failures are indistinguishable to the caller

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{NewUser, StoreError, UserRecord, UserStore};
use chrono::{DateTime, Utc};
use todo_shared::types::{LoginRequest, LoginResponse, RegisterRequest, UserSummary, BEARER_TOKEN_TYPE};
use tracing::{info, warn};
use uuid::Uuid;

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user
    ///
    /// The request is expected to be validated already. No token is issued;
    /// the client logs in separately.
    pub async fn register(users: &dyn UserStore, req: RegisterRequest) -> Result<UserRecord, ApiError> {
        // Best-effort pre-check; the store's unique constraint is authoritative
        if users.find_by_email(&req.email).await?.is_some() {
            info!("Registration rejected: email already registered");
            return Err(ApiError::UserExists);
        }

        let password_hash = PasswordService::hash_async(req.password)
            .await
            .map_err(ApiError::Internal)?;

        let new_user = NewUser {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            password_hash,
        };

        let user = users.create(new_user).await.map_err(|e| match e {
            StoreError::Conflict(_) => ApiError::UserExists,
            other => ApiError::Storage(other),
        })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Login with email and password, issuing a token valid from `now`
    pub async fn login(
        users: &dyn UserStore,
        jwt_service: &JwtService,
        req: LoginRequest,
        now: DateTime<Utc>,
    ) -> Result<LoginResponse, ApiError> {
        let Some(user) = users.find_by_email(&req.email).await? else {
            PasswordService::verify_dummy(req.password).await;
            info!("Login failed");
            return Err(ApiError::InvalidCredentials);
        };

        let valid = match PasswordService::verify_async(req.password, user.password_hash.clone()).await {
            Ok(valid) => valid,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Stored password hash is unusable");
                false
            }
        };

        if !valid {
            info!("Login failed");
            return Err(ApiError::InvalidCredentials);
        }

        let access_token = jwt_service
            .issue(user.id, now)
            .map_err(ApiError::TokenGeneration)?;

        info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse {
            access_token,
            token_type: BEARER_TOKEN_TYPE.to_string(),
            user: UserSummary::from(&user),
        })
    }

    /// Non-sensitive view of the authenticated user
    pub async fn current_user(users: &dyn UserStore, user_id: Uuid) -> Result<UserSummary, ApiError> {
        let user = users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        Ok(UserSummary::from(&user))
    }
}
