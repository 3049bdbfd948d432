//! Outbound job queue.
//!
//! Only the publishing side lives here; the mail worker consumes the queue
//! out of process.

use async_trait::async_trait;
use ma_common::Message;

pub mod error;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use error::QueueError;

pub type Result<T> = std::result::Result<T, QueueError>;

/// Trait for publishing messages to a queue
#[async_trait]
pub trait QueuePublisher: Send + Sync {
    /// Get the queue identifier
    fn identifier(&self) -> &str;

    /// Publish a single message, returning its broker id
    async fn publish(&self, message: Message) -> Result<String>;

    /// Publish a batch of messages
    async fn publish_batch(&self, messages: Vec<Message>) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(messages.len());
        for message in messages {
            ids.push(self.publish(message).await?);
        }
        Ok(ids)
    }
}

/// Publisher that owns its storage (embedded/dev deployments)
#[async_trait]
pub trait EmbeddedQueue: QueuePublisher {
    /// Initialize the queue schema (create tables, etc.)
    async fn init_schema(&self) -> Result<()>;

    /// Number of messages waiting to be consumed
    async fn pending_count(&self) -> Result<u64>;
}
