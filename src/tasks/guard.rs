//! Ownership guard for task operations

use sqlx::SqlitePool;
use tracing::warn;

use super::models::Task;
use super::repository;
use crate::common::ApiError;

pub const TASK_NOT_FOUND: &str = "Task not found";
pub const ACCESS_DENIED: &str = "Access denied to this task";

/// Loads a task on behalf of a requesting user.
///
/// A missing task is `NotFound`; a task owned by anyone else is `Forbidden`.
/// Every task operation addressed by id goes through `authorize` before it
/// reads or writes anything else.
#[derive(Clone)]
pub struct OwnershipGuard {
    db: SqlitePool,
}

impl OwnershipGuard {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn authorize(&self, task_id: &str, requesting_user_id: &str) -> Result<Task, ApiError> {
        let task = repository::find_by_id(&self.db, task_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(TASK_NOT_FOUND.to_string()))?;

        if task.owner_id != requesting_user_id {
            warn!(
                task_id = %task_id,
                user_id = %requesting_user_id,
                "Rejected access to task owned by another user"
            );
            return Err(ApiError::Forbidden(ACCESS_DENIED.to_string()));
        }

        Ok(task)
    }
}
