//! Task persistence
//!
//! Plain row access. None of these functions check ownership; callers go
//! through `OwnershipGuard` first for anything addressed by task id.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::models::{Task, UpdateTaskRequest};
use crate::common::ApiError;

const TASK_COLUMNS: &str = "id, owner_id, title, description, priority, completed, completed_at, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, task_id: &str) -> Result<Option<Task>, ApiError> {
    let sql = format!("SELECT {} FROM tasks WHERE id = ?", TASK_COLUMNS);
    sqlx::query_as::<_, Task>(&sql)
        .bind(task_id)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::DatabaseError)
}

/// Newest first; rowid breaks ties between tasks created in the same instant
pub async fn list_by_owner(pool: &SqlitePool, owner_id: &str) -> Result<Vec<Task>, ApiError> {
    let sql = format!(
        "SELECT {} FROM tasks WHERE owner_id = ? ORDER BY created_at DESC, rowid DESC",
        TASK_COLUMNS
    );
    sqlx::query_as::<_, Task>(&sql)
        .bind(owner_id)
        .fetch_all(pool)
        .await
        .map_err(ApiError::DatabaseError)
}

pub async fn insert(pool: &SqlitePool, task: &Task) -> Result<(), ApiError> {
    sqlx::query(
        r#"
        INSERT INTO tasks (
            id, owner_id, title, description, priority, completed, completed_at,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&task.id)
    .bind(&task.owner_id)
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.priority)
    .bind(task.completed)
    .bind(&task.completed_at)
    .bind(&task.created_at)
    .bind(&task.updated_at)
    .execute(pool)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(())
}

/// Writes the fields present in `patch`. Returns false when the patch is
/// empty and nothing was written.
///
/// `completed: true` keeps an existing completion stamp; `false` clears it.
pub async fn apply_patch(
    pool: &SqlitePool,
    task_id: &str,
    patch: &UpdateTaskRequest,
    now: &str,
) -> Result<bool, ApiError> {
    if patch.is_empty() {
        return Ok(false);
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE tasks SET ");
    let mut fields = builder.separated(", ");

    if let Some(title) = &patch.title {
        fields.push("title = ").push_bind_unseparated(title.trim().to_string());
    }
    match &patch.description {
        Some(Some(description)) => {
            fields
                .push("description = ")
                .push_bind_unseparated(description.clone());
        }
        Some(None) => {
            fields.push("description = NULL");
        }
        None => {}
    }
    if let Some(priority) = patch.priority {
        fields.push("priority = ").push_bind_unseparated(priority);
    }
    match patch.completed {
        Some(true) => {
            fields.push("completed = 1");
            fields
                .push("completed_at = COALESCE(completed_at, ")
                .push_bind_unseparated(now.to_string())
                .push_unseparated(")");
        }
        Some(false) => {
            fields.push("completed = 0");
            fields.push("completed_at = NULL");
        }
        None => {}
    }
    fields.push("updated_at = ").push_bind_unseparated(now.to_string());

    builder.push(" WHERE id = ").push_bind(task_id.to_string());

    builder
        .build()
        .execute(pool)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(true)
}

/// Always stamps `now`, even when the task was already completed
pub async fn mark_completed(pool: &SqlitePool, task_id: &str, now: &str) -> Result<(), ApiError> {
    sqlx::query("UPDATE tasks SET completed = 1, completed_at = ?, updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(now)
        .bind(task_id)
        .execute(pool)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(())
}

pub async fn delete(pool: &SqlitePool, task_id: &str) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(task_id)
        .execute(pool)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(result.rows_affected() > 0)
}
