//! Persistence ports and their adapters
//!
//! Services only see the [`UserStore`] and [`TaskStore`] traits. Two adapters
//! implement them: the PostgreSQL repositories used in production and an
//! in-memory store used by tests and local runs.

pub mod memory;
pub mod task;
pub mod user;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use memory::InMemoryStore;
pub use task::{NewTask, PgTaskRepository, TaskChanges, TaskRecord};
pub use user::{NewUser, PgUserRepository, UserRecord};

/// Storage failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    /// A uniqueness constraint rejected the write (e.g. duplicate email)
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict(db_err.constraint().unwrap_or("unique").to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Identity persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new identity; duplicate email yields [`StoreError::Conflict`]
    async fn create(&self, new_user: NewUser) -> StoreResult<UserRecord>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>>;
}

/// Task persistence
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(&self, new_task: NewTask) -> StoreResult<TaskRecord>;

    /// All tasks of one owner, newest first
    async fn find_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<TaskRecord>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<TaskRecord>>;

    /// Apply a partial update; [`StoreError::NotFound`] if the task is gone
    async fn update(&self, id: Uuid, changes: TaskChanges) -> StoreResult<TaskRecord>;

    /// Delete a task scoped to its owner; [`StoreError::NotFound`] if no row matched
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> StoreResult<()>;
}
