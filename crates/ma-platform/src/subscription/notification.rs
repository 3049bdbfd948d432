//! Subscription notifications.
//!
//! When a subscription is admitted the organizer gets an email. The platform
//! only hands the job to the outbound queue; the mail worker renders and
//! sends it.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use ma_common::Message;
use ma_queue::QueuePublisher;

use crate::meetup::MeetupWithOwner;
use crate::user::User;

/// A job for the mail worker.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationJob {
    pub job_key: String,
    pub payload: serde_json::Value,
    /// Jobs of one group are delivered in order
    pub group: Option<String>,
}

impl NotificationJob {
    pub const SUBSCRIPTION_MAIL: &'static str = "SubscriptionMail";

    /// "`subscriber` signed up for `meetup`", addressed to the organizer.
    pub fn subscription_mail(meetup: &MeetupWithOwner, subscriber: &User) -> Self {
        let payload = json!({
            "meetup": {
                "id": meetup.meetup.id,
                "title": meetup.meetup.title,
                "location": meetup.meetup.location,
                "date": meetup.meetup.date,
                "owner": {
                    "id": meetup.owner.id,
                    "name": meetup.owner.name,
                    "email": meetup.owner.email,
                },
            },
            "user": {
                "id": subscriber.id,
                "name": subscriber.name,
                "email": subscriber.email,
            },
        });

        Self {
            job_key: Self::SUBSCRIPTION_MAIL.to_string(),
            payload,
            group: Some(format!("meetup:{}", meetup.meetup.id)),
        }
    }

    pub fn into_message(self) -> Message {
        let message = Message::new(self.job_key, self.payload);
        match self.group {
            Some(group) => message.with_message_group(group),
            None => message,
        }
    }
}

/// Outbound port for notification jobs. Delivery is the queue's concern;
/// callers treat a failed hand-off as non-fatal.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Hand off a job, returning its queue id.
    async fn enqueue(&self, job: NotificationJob) -> ma_queue::Result<String>;
}

/// Dispatcher backed by a `QueuePublisher`.
pub struct QueueNotificationDispatcher {
    publisher: Arc<dyn QueuePublisher>,
}

impl QueueNotificationDispatcher {
    pub fn new(publisher: Arc<dyn QueuePublisher>) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl NotificationDispatcher for QueueNotificationDispatcher {
    async fn enqueue(&self, job: NotificationJob) -> ma_queue::Result<String> {
        let job_key = job.job_key.clone();
        let id = self.publisher.publish(job.into_message()).await?;
        tracing::debug!(
            queue = %self.publisher.identifier(),
            job_key = %job_key,
            message_id = %id,
            "Notification enqueued"
        );
        Ok(id)
    }
}
