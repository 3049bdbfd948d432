use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

pub mod logging;

// ============================================================================
// Queue Message Types
// ============================================================================

/// A background job handed to the outbound queue.
///
/// `job_key` names the handler the worker should run (e.g. `SubscriptionMail`);
/// `payload` is the handler-specific JSON body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub job_key: String,
    pub payload: serde_json::Value,
    /// Jobs sharing a group are delivered in order
    #[serde(default)]
    pub message_group_id: Option<String>,
    pub enqueued_at: DateTime<Utc>,
}

impl Message {
    pub fn new(job_key: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            job_key: job_key.into(),
            payload,
            message_group_id: None,
            enqueued_at: Utc::now(),
        }
    }

    pub fn with_message_group(mut self, group: impl Into<String>) -> Self {
        self.message_group_id = Some(group.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serializes_camel_case() {
        let msg = Message::new("SubscriptionMail", serde_json::json!({ "meetupId": "M1" }))
            .with_message_group("meetup:M1");

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["jobKey"], "SubscriptionMail");
        assert_eq!(json["messageGroupId"], "meetup:M1");
        assert_eq!(json["payload"]["meetupId"], "M1");
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::new("k", serde_json::Value::Null);
        let b = Message::new("k", serde_json::Value::Null);
        assert_ne!(a.id, b.id);
    }
}
