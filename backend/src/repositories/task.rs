//! Task repository for database operations

use super::{StoreError, StoreResult, TaskStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use todo_shared::types::{TaskResponse, UpdateTaskRequest};
use uuid::Uuid;

/// Task record from database
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TaskRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: bool,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TaskRecord> for TaskResponse {
    fn from(task: TaskRecord) -> Self {
        TaskResponse {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            user_id: task.user_id,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Input for creating a task; new tasks always start incomplete
#[derive(Debug, Clone)]
pub struct NewTask {
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
}

/// Partial update: `None` leaves the column unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<bool>,
}

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(req: UpdateTaskRequest) -> Self {
        TaskChanges {
            title: req.title,
            description: req.description,
            status: req.status,
        }
    }
}

impl TaskChanges {
    /// Apply the changes to an in-memory record
    pub fn apply(self, task: &mut TaskRecord, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        task.updated_at = now;
    }
}

/// PostgreSQL-backed [`TaskStore`]
#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskRepository {
    async fn create(&self, new_task: NewTask) -> StoreResult<TaskRecord> {
        let task = sqlx::query_as::<_, TaskRecord>(
            r#"
            INSERT INTO tasks (title, description, status, user_id)
            VALUES ($1, $2, FALSE, $3)
            RETURNING id, title, description, status, user_id, created_at, updated_at
            "#,
        )
        .bind(&new_task.title)
        .bind(&new_task.description)
        .bind(new_task.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<TaskRecord>> {
        let tasks = sqlx::query_as::<_, TaskRecord>(
            r#"
            SELECT id, title, description, status, user_id, created_at, updated_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<TaskRecord>> {
        let task = sqlx::query_as::<_, TaskRecord>(
            r#"
            SELECT id, title, description, status, user_id, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn update(&self, id: Uuid, changes: TaskChanges) -> StoreResult<TaskRecord> {
        sqlx::query_as::<_, TaskRecord>(
            r#"
            UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> TaskRecord {
        let created = Utc::now() - chrono::Duration::minutes(5);
        TaskRecord {
            id: Uuid::new_v4(),
            title: "T".to_string(),
            description: "D".to_string(),
            status: false,
            user_id: Uuid::new_v4(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut task = sample_task();
        let now = Utc::now();
        let changes = TaskChanges {
            title: Some("T2".to_string()),
            status: Some(true),
            ..Default::default()
        };

        changes.apply(&mut task, now);

        assert_eq!(task.title, "T2");
        assert_eq!(task.description, "D");
        assert!(task.status);
        assert_eq!(task.updated_at, now);
    }

    #[test]
    fn test_changes_from_update_request() {
        let req = UpdateTaskRequest {
            title: None,
            description: Some("new".to_string()),
            status: None,
        };
        let changes = TaskChanges::from(req);
        assert_eq!(changes.description.as_deref(), Some("new"));
        assert!(changes.title.is_none());
    }
}
