// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use tracing::{info, warn};

/// Run all database migrations
///
/// Tables are created if missing. With `reset` set, existing tables are
/// dropped first, which destroys every user mirror and task.
pub async fn run_migrations(pool: &SqlitePool, reset: bool) -> Result<(), sqlx::Error> {
    if reset {
        warn!("RESET_DB=true - Dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
        info!("Dropped old tables");
    } else {
        info!("Skipping table drop (RESET_DB not set). Tables will be created if they don't exist.");
    }

    create_user_tables(pool).await?;
    create_task_tables(pool).await?;
    create_indexes(pool).await?;

    info!("Database migration completed successfully");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Children first so foreign keys never dangle mid-drop
    for table in ["tasks", "users"] {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }
    Ok(())
}

async fn create_user_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // external_id is the identity provider's subject; one local row per subject
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            external_id TEXT UNIQUE NOT NULL,
            email TEXT NOT NULL,
            name TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_task_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL REFERENCES users(id),
            title TEXT NOT NULL CHECK (length(trim(title)) > 0),
            description TEXT,
            priority TEXT NOT NULL CHECK (priority IN ('low', 'medium', 'high')),
            completed INTEGER NOT NULL DEFAULT 0,
            completed_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            CHECK ((completed = 0 AND completed_at IS NULL) OR (completed = 1 AND completed_at IS NOT NULL))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_tasks_owner_created ON tasks(owner_id, created_at DESC)",
    ];

    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::setup_test_db;
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = setup_test_db().await;
        run_migrations(&pool, false).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'tasks') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(tables.len(), 2);
    }

    #[tokio::test]
    async fn test_external_id_is_unique() {
        let pool = setup_test_db().await;

        let insert = "INSERT INTO users (id, external_id, email, created_at, updated_at) VALUES (?, ?, ?, datetime('now'), datetime('now'))";
        sqlx::query(insert)
            .bind("U_1")
            .bind("sub-1")
            .bind("a@example.com")
            .execute(&pool)
            .await
            .unwrap();

        let duplicate = sqlx::query(insert)
            .bind("U_2")
            .bind("sub-1")
            .bind("b@example.com")
            .execute(&pool)
            .await;

        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn test_completion_invariant_is_enforced_by_schema() {
        let pool = setup_test_db().await;

        sqlx::query("INSERT INTO users (id, external_id, email, created_at, updated_at) VALUES ('U_1', 'sub-1', 'a@example.com', 'now', 'now')")
            .execute(&pool)
            .await
            .unwrap();

        let bad = sqlx::query(
            "INSERT INTO tasks (id, owner_id, title, priority, completed, completed_at, created_at, updated_at) VALUES ('T_1', 'U_1', 'x', 'low', 1, NULL, 'now', 'now')",
        )
        .execute(&pool)
        .await;

        assert!(bad.is_err());
    }

    #[tokio::test]
    async fn test_reset_drops_existing_rows() {
        let pool = setup_test_db().await;

        sqlx::query("INSERT INTO users (id, external_id, email, created_at, updated_at) VALUES ('U_1', 'sub-1', 'a@example.com', 'now', 'now')")
            .execute(&pool)
            .await
            .unwrap();

        run_migrations(&pool, true).await.unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }
}
