//! In-memory implementation of the persistence ports
//!
//! Mirrors the PostgreSQL schema constraints that the services rely on:
//! unique email, owner-scoped delete, partial updates bumping `updated_at`.

use super::{
    NewTask, NewUser, StoreError, StoreResult, TaskChanges, TaskRecord, TaskStore, UserRecord,
    UserStore,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local store holding users and tasks
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
    /// Insertion order doubles as creation order
    tasks: RwLock<Vec<TaskRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn task_count(&self) -> usize {
        self.tasks.read().await.len()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create(&self, new_user: NewUser) -> StoreResult<UserRecord> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }

        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            phone: new_user.phone,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn create(&self, new_task: NewTask) -> StoreResult<TaskRecord> {
        let now = Utc::now();
        let task = TaskRecord {
            id: Uuid::new_v4(),
            title: new_task.title,
            description: new_task.description,
            status: false,
            user_id: new_task.owner_id,
            created_at: now,
            updated_at: now,
        };
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<TaskRecord>> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .rev()
            .filter(|t| t.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<TaskRecord>> {
        Ok(self.tasks.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: TaskChanges) -> StoreResult<TaskRecord> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;
        changes.apply(task, Utc::now());
        Ok(task.clone())
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> StoreResult<()> {
        let mut tasks = self.tasks.write().await;
        match tasks
            .iter()
            .position(|t| t.id == id && t.user_id == owner_id)
        {
            Some(index) => {
                tasks.remove(index);
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }
}
