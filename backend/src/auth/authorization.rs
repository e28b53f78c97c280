//! Task ownership checks
//!
//! A task may only be read, updated or deleted by the identity that created
//! it. Existence is not hidden: an unknown id is `404`, somebody else's task
//! is `403`.

use crate::error::ApiError;
use crate::repositories::{TaskRecord, TaskStore};
use tracing::info;
use uuid::Uuid;

/// Compare a resource owner with the caller
pub fn check_owner(owner_id: Uuid, caller_id: Uuid) -> Result<(), ApiError> {
    if owner_id != caller_id {
        return Err(ApiError::Forbidden(
            "Not authorized to access this task".to_string(),
        ));
    }
    Ok(())
}

/// Load a task and make sure `caller_id` owns it
pub async fn require_owner(
    tasks: &dyn TaskStore,
    task_id: Uuid,
    caller_id: Uuid,
) -> Result<TaskRecord, ApiError> {
    let task = tasks
        .find_by_id(task_id)
        .await?
        .ok_or(ApiError::TaskNotFound)?;

    if let Err(err) = check_owner(task.user_id, caller_id) {
        info!(%task_id, %caller_id, "Ownership check failed");
        return Err(err);
    }

    Ok(task)
}
