use sqlx::SqlitePool;
use tracing::info;

use super::guard::OwnershipGuard;
use super::models::{
    CreateTaskRequest, MarkDoneResponse, MessageResponse, Task, UpdateTaskRequest,
};
use super::repository;
use crate::common::{generate_task_id, now_rfc3339, ApiError, Validator};

pub const DELETED_MESSAGE: &str = "Task deleted successfully";
pub const MARKED_DONE_MESSAGE: &str = "Task marked as completed successfully";

/// Task lifecycle for one authenticated owner at a time.
///
/// `owner_id` always comes from the verified session, never from a request
/// body.
pub struct TasksService {
    db: SqlitePool,
    guard: OwnershipGuard,
}

impl TasksService {
    pub fn new(db: SqlitePool) -> Self {
        let guard = OwnershipGuard::new(db.clone());
        Self { db, guard }
    }

    pub async fn create(&self, owner_id: &str, request: CreateTaskRequest) -> Result<Task, ApiError> {
        request.validate(&request).into_result()?;

        let now = now_rfc3339();
        let task = Task {
            id: generate_task_id(),
            owner_id: owner_id.to_string(),
            title: request.title.trim().to_string(),
            description: request.description,
            priority: request.priority,
            completed: false,
            completed_at: None,
            created_at: now.clone(),
            updated_at: now,
        };

        repository::insert(&self.db, &task).await?;

        info!(task_id = %task.id, user_id = %owner_id, "Created task");

        Ok(task)
    }

    pub async fn list(&self, owner_id: &str) -> Result<Vec<Task>, ApiError> {
        repository::list_by_owner(&self.db, owner_id).await
    }

    pub async fn get(&self, task_id: &str, owner_id: &str) -> Result<Task, ApiError> {
        self.guard.authorize(task_id, owner_id).await
    }

    pub async fn update(
        &self,
        task_id: &str,
        owner_id: &str,
        request: UpdateTaskRequest,
    ) -> Result<Task, ApiError> {
        let current = self.guard.authorize(task_id, owner_id).await?;
        request.validate(&request).into_result()?;

        if !repository::apply_patch(&self.db, task_id, &request, &now_rfc3339()).await? {
            return Ok(current);
        }

        info!(task_id = %task_id, user_id = %owner_id, "Updated task");

        self.reload(task_id).await
    }

    pub async fn delete(&self, task_id: &str, owner_id: &str) -> Result<MessageResponse, ApiError> {
        self.guard.authorize(task_id, owner_id).await?;

        if !repository::delete(&self.db, task_id).await? {
            return Err(ApiError::NotFound(super::guard::TASK_NOT_FOUND.to_string()));
        }

        info!(task_id = %task_id, user_id = %owner_id, "Deleted task");

        Ok(MessageResponse {
            message: DELETED_MESSAGE.to_string(),
        })
    }

    /// Completes the task and stamps it with the current time. A task that
    /// was already completed gets a fresh stamp.
    pub async fn mark_completed(
        &self,
        task_id: &str,
        owner_id: &str,
    ) -> Result<MarkDoneResponse, ApiError> {
        self.guard.authorize(task_id, owner_id).await?;

        repository::mark_completed(&self.db, task_id, &now_rfc3339()).await?;
        let task = self.reload(task_id).await?;

        info!(task_id = %task_id, user_id = %owner_id, "Marked task completed");

        Ok(MarkDoneResponse {
            message: MARKED_DONE_MESSAGE.to_string(),
            completed_at: task.completed_at.clone(),
            task,
        })
    }

    async fn reload(&self, task_id: &str) -> Result<Task, ApiError> {
        repository::find_by_id(&self.db, task_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(super::guard::TASK_NOT_FOUND.to_string()))
    }
}
