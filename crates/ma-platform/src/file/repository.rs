//! File Repository

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use super::entity::File;
use crate::shared::error::Result;
use crate::shared::schema::from_millis;

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<File>>;
    async fn insert(&self, file: &File) -> Result<()>;
}

pub struct SqliteFileRepository {
    pool: SqlitePool,
}

impl SqliteFileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for SqliteFileRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<File>> {
        let row = sqlx::query("SELECT id, name, path, created_at FROM files WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(File {
                id: row.get("id"),
                name: row.get("name"),
                path: row.get("path"),
                created_at: from_millis("created_at", row.get("created_at"))?,
            })),
            None => Ok(None),
        }
    }

    async fn insert(&self, file: &File) -> Result<()> {
        sqlx::query("INSERT INTO files (id, name, path, created_at) VALUES (?, ?, ?, ?)")
            .bind(&file.id)
            .bind(&file.name)
            .bind(&file.path)
            .bind(file.created_at.timestamp_millis())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
