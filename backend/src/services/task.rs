//! Task service
//!
//! Every single-task operation goes through [`require_owner`] before it
//! touches the record. Listing is scoped by owner at the query.

use crate::auth::require_owner;
use crate::error::ApiError;
use crate::repositories::{NewTask, StoreError, TaskChanges, TaskRecord, TaskStore};
use todo_shared::types::{CreateTaskRequest, UpdateTaskRequest};
use tracing::info;
use uuid::Uuid;

pub struct TaskService;

impl TaskService {
    pub async fn create(
        tasks: &dyn TaskStore,
        owner_id: Uuid,
        req: CreateTaskRequest,
    ) -> Result<TaskRecord, ApiError> {
        let task = tasks
            .create(NewTask {
                owner_id,
                title: req.title,
                description: req.description,
            })
            .await?;

        info!(task_id = %task.id, %owner_id, "Task created");
        Ok(task)
    }

    pub async fn list(tasks: &dyn TaskStore, owner_id: Uuid) -> Result<Vec<TaskRecord>, ApiError> {
        Ok(tasks.find_by_owner(owner_id).await?)
    }

    pub async fn get(
        tasks: &dyn TaskStore,
        owner_id: Uuid,
        task_id: Uuid,
    ) -> Result<TaskRecord, ApiError> {
        require_owner(tasks, task_id, owner_id).await
    }

    /// Partial update: only fields present in the request change
    pub async fn update(
        tasks: &dyn TaskStore,
        owner_id: Uuid,
        task_id: Uuid,
        req: UpdateTaskRequest,
    ) -> Result<TaskRecord, ApiError> {
        if req.is_empty() {
            return Err(ApiError::validation(
                "at least one of title, description or status must be provided",
            ));
        }

        require_owner(tasks, task_id, owner_id).await?;

        let task = tasks
            .update(task_id, TaskChanges::from(req))
            .await
            .map_err(not_found_as_task)?;

        info!(%task_id, "Task updated");
        Ok(task)
    }

    pub async fn delete(tasks: &dyn TaskStore, owner_id: Uuid, task_id: Uuid) -> Result<(), ApiError> {
        require_owner(tasks, task_id, owner_id).await?;

        tasks
            .delete(task_id, owner_id)
            .await
            .map_err(not_found_as_task)?;

        info!(%task_id, "Task deleted");
        Ok(())
    }
}

/// The row can vanish between the ownership check and the write
fn not_found_as_task(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound => ApiError::TaskNotFound,
        other => ApiError::Storage(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryStore;

    fn create_request(title: &str) -> CreateTaskRequest {
        CreateTaskRequest {
            title: title.to_string(),
            description: "D".to_string(),
        }
    }

    #[tokio::test]
    async fn test_created_task_starts_incomplete() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();

        let task = TaskService::create(&store, owner, create_request("T")).await.unwrap();

        assert!(!task.status);
        assert_eq!(task.user_id, owner);
    }

    #[tokio::test]
    async fn test_update_keeps_absent_fields() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        let task = TaskService::create(&store, owner, create_request("T")).await.unwrap();

        let updated = TaskService::update(
            &store,
            owner,
            task.id,
            UpdateTaskRequest {
                title: Some("T2".to_string()),
                description: None,
                status: Some(true),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.title, "T2");
        assert_eq!(updated.description, "D");
        assert!(updated.status);
        assert!(updated.updated_at >= task.updated_at);
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        let task = TaskService::create(&store, owner, create_request("T")).await.unwrap();

        let err = TaskService::update(&store, owner, task.id, UpdateTaskRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected_before_ownership() {
        let store = InMemoryStore::new();
        let task = TaskService::create(&store, Uuid::new_v4(), create_request("T")).await.unwrap();

        for task_id in [task.id, Uuid::new_v4()] {
            let err = TaskService::update(&store, Uuid::new_v4(), task_id, UpdateTaskRequest::default())
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::Validation { .. }));
        }
    }

    #[tokio::test]
    async fn test_non_owner_cannot_touch_task() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let task = TaskService::create(&store, owner, create_request("T")).await.unwrap();

        let get = TaskService::get(&store, intruder, task.id).await.unwrap_err();
        let update = TaskService::update(
            &store,
            intruder,
            task.id,
            UpdateTaskRequest {
                status: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        let delete = TaskService::delete(&store, intruder, task.id).await.unwrap_err();

        assert!(matches!(get, ApiError::Forbidden(_)));
        assert!(matches!(update, ApiError::Forbidden(_)));
        assert!(matches!(delete, ApiError::Forbidden(_)));

        let untouched = TaskService::get(&store, owner, task.id).await.unwrap();
        assert!(!untouched.status);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        let task = TaskService::create(&store, owner, create_request("T")).await.unwrap();

        TaskService::delete(&store, owner, task.id).await.unwrap();

        let err = TaskService::get(&store, owner, task.id).await.unwrap_err();
        assert!(matches!(err, ApiError::TaskNotFound));
    }

    #[tokio::test]
    async fn test_list_only_returns_own_tasks() {
        let store = InMemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        TaskService::create(&store, alice, create_request("a")).await.unwrap();
        TaskService::create(&store, bob, create_request("b")).await.unwrap();

        let tasks = TaskService::list(&store, alice).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "a");

        assert!(TaskService::list(&store, Uuid::new_v4()).await.unwrap().is_empty());
    }
}
