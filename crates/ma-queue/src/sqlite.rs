use async_trait::async_trait;
use sqlx::{Pool, Sqlite};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use ma_common::Message;
use crate::{EmbeddedQueue, QueueError, QueuePublisher, Result};

/// SQLite-backed job queue.
///
/// Messages are stored as JSON rows; the worker polls `queue_messages` in
/// `created_at` order, one message per group at a time.
pub struct SqliteQueue {
    pool: Pool<Sqlite>,
    queue_name: String,
    running: AtomicBool,
}

impl SqliteQueue {
    pub fn new(pool: Pool<Sqlite>, queue_name: impl Into<String>) -> Self {
        Self {
            pool,
            queue_name: queue_name.into(),
            running: AtomicBool::new(true),
        }
    }

    /// Reject further publishes
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        info!(queue = %self.queue_name, "SQLite queue stopped");
    }
}

#[async_trait]
impl QueuePublisher for SqliteQueue {
    fn identifier(&self) -> &str {
        &self.queue_name
    }

    async fn publish(&self, message: Message) -> Result<String> {
        if !self.running.load(Ordering::SeqCst) {
            return Err(QueueError::Stopped);
        }

        let payload = serde_json::to_string(&message)?;
        let now = message.enqueued_at.timestamp_millis();

        sqlx::query(
            r#"
            INSERT INTO queue_messages (id, queue_name, job_key, message_group_id, visible_at, payload, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(queue_name, id) DO NOTHING
            "#,
        )
        .bind(&message.id)
        .bind(&self.queue_name)
        .bind(&message.job_key)
        .bind(&message.message_group_id)
        .bind(now)
        .bind(&payload)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(
            queue = %self.queue_name,
            message_id = %message.id,
            job_key = %message.job_key,
            "Message published"
        );

        Ok(message.id)
    }
}

#[async_trait]
impl EmbeddedQueue for SqliteQueue {
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS queue_messages (
                id TEXT NOT NULL,
                queue_name TEXT NOT NULL,
                job_key TEXT NOT NULL,
                message_group_id TEXT,
                receipt_handle TEXT,
                visible_at INTEGER NOT NULL,
                payload TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                receive_count INTEGER DEFAULT 0,
                PRIMARY KEY (queue_name, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_queue_visible
            ON queue_messages (queue_name, visible_at, message_group_id)
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!(queue = %self.queue_name, "SQLite queue schema initialized");
        Ok(())
    }

    async fn pending_count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM queue_messages WHERE queue_name = ?",
        )
        .bind(&self.queue_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn queue() -> SqliteQueue {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let queue = SqliteQueue::new(pool, "notifications");
        queue.init_schema().await.unwrap();
        queue
    }

    #[tokio::test]
    async fn test_publish_stores_message() {
        let queue = queue().await;
        let message = Message::new("SubscriptionMail", serde_json::json!({ "a": 1 }));
        let expected_id = message.id.clone();

        let id = queue.publish(message).await.unwrap();

        assert_eq!(id, expected_id);
        assert_eq!(queue.pending_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_republish_same_id_is_idempotent() {
        let queue = queue().await;
        let message = Message::new("SubscriptionMail", serde_json::Value::Null);

        queue.publish(message.clone()).await.unwrap();
        queue.publish(message).await.unwrap();

        assert_eq!(queue.pending_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_publish_batch() {
        let queue = queue().await;
        let messages = vec![
            Message::new("SubscriptionMail", serde_json::Value::Null),
            Message::new("CancellationMail", serde_json::Value::Null),
        ];

        let ids = queue.publish_batch(messages).await.unwrap();

        assert_eq!(ids.len(), 2);
        assert_eq!(queue.pending_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_stopped_queue_rejects_publish() {
        let queue = queue().await;
        queue.stop();

        let result = queue.publish(Message::new("SubscriptionMail", serde_json::Value::Null)).await;
        assert!(matches!(result, Err(QueueError::Stopped)));
    }
}
