//! Task API routes
//!
//! Mounted behind `auth_middleware`, so every handler gets an `AuthUser`.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::{TaskId, ValidatedJson};
use crate::services::TaskService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use todo_shared::types::{ApiResponse, CreateTaskRequest, TaskResponse, UpdateTaskRequest};

/// Create task routes
pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_task).get(list_tasks))
        .route("/:id", get(get_task).put(update_task).delete(delete_task))
}

/// POST /api/tasks
async fn create_task(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TaskResponse>>)> {
    let task = TaskService::create(state.tasks(), auth.user_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Task created successfully", task.into())),
    ))
}

/// GET /api/tasks - newest first, own tasks only
async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<TaskResponse>>>> {
    let tasks = TaskService::list(state.tasks(), auth.user_id).await?;
    let tasks = tasks.into_iter().map(TaskResponse::from).collect();
    Ok(Json(ApiResponse::success("Tasks retrieved successfully", tasks)))
}

/// GET /api/tasks/:id
async fn get_task(
    State(state): State<AppState>,
    auth: AuthUser,
    TaskId(task_id): TaskId,
) -> ApiResult<Json<ApiResponse<TaskResponse>>> {
    let task = TaskService::get(state.tasks(), auth.user_id, task_id).await?;
    Ok(Json(ApiResponse::success("Task retrieved successfully", task.into())))
}

/// PUT /api/tasks/:id
///
/// Fields missing from the body keep their current value.
async fn update_task(
    State(state): State<AppState>,
    auth: AuthUser,
    TaskId(task_id): TaskId,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<ApiResponse<TaskResponse>>> {
    let task = TaskService::update(state.tasks(), auth.user_id, task_id, req).await?;
    Ok(Json(ApiResponse::success("Task updated successfully", task.into())))
}

/// DELETE /api/tasks/:id
async fn delete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    TaskId(task_id): TaskId,
) -> ApiResult<Json<ApiResponse<()>>> {
    TaskService::delete(state.tasks(), auth.user_id, task_id).await?;
    Ok(Json(ApiResponse::message("Task deleted successfully")))
}
