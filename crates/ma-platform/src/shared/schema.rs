//! SQLite schema for the platform tables.
//!
//! Timestamps are INTEGER columns holding UTC milliseconds. Two meetups
//! "share a date" when their `date` values are equal.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;

use super::error::{PlatformError, Result};

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS files (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        path TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS meetups (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL REFERENCES users (id),
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        location TEXT NOT NULL,
        date INTEGER NOT NULL,
        banner_id TEXT REFERENCES files (id),
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS subscriptions (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id),
        meetup_id TEXT NOT NULL REFERENCES meetups (id) ON DELETE CASCADE,
        created_at INTEGER NOT NULL,
        UNIQUE (user_id, meetup_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_meetups_owner_date ON meetups (owner_id, date)",
    "CREATE INDEX IF NOT EXISTS idx_meetups_date ON meetups (date)",
    "CREATE INDEX IF NOT EXISTS idx_subscriptions_user ON subscriptions (user_id)",
];

/// Create the platform tables and indexes if they do not exist.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Platform schema initialized");
    Ok(())
}

/// Read a millisecond column back into a UTC timestamp.
pub(crate) fn from_millis(column: &str, millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| PlatformError::internal(format!("Invalid {} timestamp: {}", column, millis)))
}

/// Map a UNIQUE constraint failure to `PlatformError::Duplicate`.
pub(crate) fn map_unique_violation(
    err: sqlx::Error,
    entity_type: &str,
    field: &str,
    value: &str,
) -> PlatformError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            PlatformError::duplicate(entity_type, field, value)
        }
        _ => PlatformError::Database(err),
    }
}

/// Single-connection in-memory database with the schema applied.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_schema(&pool).await.unwrap();
    pool
}
