//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Pre-compute expensive resources**: JWT keys and the DB pool are created once
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **Storage behind ports**: handlers only see `UserStore` / `TaskStore`

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::repositories::{InMemoryStore, PgTaskRepository, PgUserRepository, TaskStore, UserStore};
use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    /// Present when backed by PostgreSQL; used by the readiness probe
    pub db: Option<PgPool>,
}

impl AppState {
    /// Build state over arbitrary store adapters
    ///
    /// Fails when the JWT secret is unusable.
    pub fn new(users: Arc<dyn UserStore>, tasks: Arc<dyn TaskStore>, config: AppConfig) -> Result<Self> {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.token_expiry_secs)?;

        Ok(Self {
            config: Arc::new(config),
            jwt,
            users,
            tasks,
            db: None,
        })
    }

    /// PostgreSQL-backed state used by the server binary
    pub fn with_postgres(pool: PgPool, config: AppConfig) -> Result<Self> {
        let users = Arc::new(PgUserRepository::new(pool.clone()));
        let tasks = Arc::new(PgTaskRepository::new(pool.clone()));

        let mut state = Self::new(users, tasks, config)?;
        state.db = Some(pool);
        Ok(state)
    }

    /// Both ports served by one in-memory store
    pub fn in_memory(config: AppConfig) -> Result<Self> {
        let store = Arc::new(InMemoryStore::new());
        Self::new(store.clone(), store, config)
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    #[inline]
    pub fn tasks(&self) -> &dyn TaskStore {
        self.tasks.as_ref()
    }

    #[inline]
    pub fn db(&self) -> Option<&PgPool> {
        self.db.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::NewUser;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.jwt.secret = "state-test-secret".to_string();
        config
    }

    #[test]
    fn test_empty_secret_fails() {
        assert!(AppState::in_memory(AppConfig::default()).is_err());
    }

    #[test]
    fn test_jwt_service_is_precomputed() {
        let state = AppState::in_memory(config()).unwrap();

        let user_id = uuid::Uuid::new_v4();
        let token = state.jwt().issue_now(user_id).unwrap();
        assert_eq!(state.jwt().verify_now(&token), Ok(user_id));
        assert!(state.db().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let state = AppState::in_memory(config()).unwrap();
        let cloned = state.clone();

        let user = state
            .users()
            .create(NewUser {
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                email: "john@x.com".to_string(),
                phone: "123".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        let found = cloned.users().find_by_id(user.id).await.unwrap();
        assert_eq!(found.map(|u| u.email), Some("john@x.com".to_string()));
    }
}
