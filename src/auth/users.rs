//! Local user mirror persistence

use sqlx::SqlitePool;
use tracing::{debug, error, info};

use super::models::User;
use crate::common::{generate_user_id, now_rfc3339, safe_email_log, ApiError};

pub async fn find_by_id(pool: &SqlitePool, user_id: &str) -> Result<Option<User>, ApiError> {
    sqlx::query_as::<_, User>(
        "SELECT id, external_id, email, name, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %user_id, "Database error during user lookup");
        ApiError::DatabaseError(e)
    })
}

pub async fn find_by_external_id(
    pool: &SqlitePool,
    external_id: &str,
) -> Result<Option<User>, ApiError> {
    sqlx::query_as::<_, User>(
        "SELECT id, external_id, email, name, created_at, updated_at FROM users WHERE external_id = ?",
    )
    .bind(external_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        error!(error = %e, external_id = %external_id, "Database error during user lookup by external id");
        ApiError::DatabaseError(e)
    })
}

/// Returns the local user for `external_id`, creating it on first sight.
///
/// An existing row is returned as stored: email and name are NOT refreshed
/// from the provider's current attributes on later logins. Whether they
/// should be is an open product question; until it is settled the lookup
/// stays create-only.
pub async fn find_or_create(
    pool: &SqlitePool,
    external_id: &str,
    email: &str,
    name: Option<&str>,
) -> Result<User, ApiError> {
    if let Some(existing) = find_by_external_id(pool, external_id).await? {
        debug!(
            user_id = %existing.id,
            external_id = %external_id,
            "Found existing user; profile attributes left as stored"
        );
        return Ok(existing);
    }

    let id = generate_user_id();
    let now = now_rfc3339();

    // A concurrent first login for the same subject loses the race quietly
    // and both callers read back the winning row.
    let inserted = sqlx::query(
        r#"
        INSERT INTO users (id, external_id, email, name, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(external_id) DO NOTHING
        "#,
    )
    .bind(&id)
    .bind(external_id)
    .bind(email)
    .bind(name)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .map_err(|e| {
        error!(
            error = %e,
            user_id = %id,
            email = %safe_email_log(email),
            "Database error inserting new user during login"
        );
        ApiError::DatabaseError(e)
    })?;

    if inserted.rows_affected() > 0 {
        info!(
            user_id = %id,
            email = %safe_email_log(email),
            "Created local user on first login"
        );
    }

    find_by_external_id(pool, external_id)
        .await?
        .ok_or_else(|| ApiError::InternalServer("user vanished after insert".to_string()))
}
