//! Task handlers. Every route takes `AuthedUser`, so the owner id is
//! always the verified session subject.

use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use std::sync::Arc;

use super::models::{CreateTaskRequest, MarkDoneResponse, MessageResponse, Task, UpdateTaskRequest};
use super::services::TasksService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// POST /tasks
///
/// # Request Body
/// ```json
/// { "title": "Write report", "priority": "high", "description": "Q3 numbers" }
/// ```
pub async fn create_task(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = TasksService::new(state.db.clone())
        .create(&user.id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /tasks
/// Lists the caller's tasks, newest first
pub async fn list_tasks(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = TasksService::new(state.db.clone()).list(&user.id).await?;
    Ok(Json(tasks))
}

/// GET /tasks/:id
pub async fn get_task(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task = TasksService::new(state.db.clone())
        .get(&task_id, &user.id)
        .await?;
    Ok(Json(task))
}

/// PATCH /tasks/:id
///
/// # Request Body
/// Any subset of `title`, `description`, `priority`, `completed`
pub async fn update_task(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    Path(task_id): Path<String>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let task = TasksService::new(state.db.clone())
        .update(&task_id, &user.id, payload)
        .await?;
    Ok(Json(task))
}

/// DELETE /tasks/:id
pub async fn delete_task(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    Path(task_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let response = TasksService::new(state.db.clone())
        .delete(&task_id, &user.id)
        .await?;
    Ok(Json(response))
}

/// POST /tasks/:id/mark-done
///
/// # Response
/// ```json
/// { "message": "Task marked as completed successfully", "task": { ... }, "completedAt": "..." }
/// ```
pub async fn mark_task_done(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    Path(task_id): Path<String>,
) -> Result<Json<MarkDoneResponse>, ApiError> {
    let response = TasksService::new(state.db.clone())
        .mark_completed(&task_id, &user.id)
        .await?;
    Ok(Json(response))
}
