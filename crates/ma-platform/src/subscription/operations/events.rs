//! Subscription Events

use serde::{Deserialize, Serialize};

use crate::subscription::Subscription;
use crate::usecase::{EventMetadata, ExecutionContext};

/// A subscription passed admission and was stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionAdmitted {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub subscription: Subscription,
    /// Queue id of the organizer notification; `None` if the hand-off failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<String>,
}

impl SubscriptionAdmitted {
    const EVENT_TYPE: &'static str = "meetapp:subscription:admitted";

    pub fn new(ctx: &ExecutionContext, subscription: Subscription, notification_id: Option<String>) -> Self {
        Self {
            metadata: EventMetadata::new(
                ctx,
                Self::EVENT_TYPE,
                format!("subscription.{}", subscription.id),
            ),
            subscription,
            notification_id,
        }
    }
}

/// A subscriber withdrew from an upcoming meetup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionCancelled {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub subscription_id: String,
    pub meetup_id: String,
}

impl SubscriptionCancelled {
    const EVENT_TYPE: &'static str = "meetapp:subscription:cancelled";

    pub fn new(ctx: &ExecutionContext, subscription_id: &str, meetup_id: &str) -> Self {
        Self {
            metadata: EventMetadata::new(
                ctx,
                Self::EVENT_TYPE,
                format!("subscription.{}", subscription_id),
            ),
            subscription_id: subscription_id.to_string(),
            meetup_id: meetup_id.to_string(),
        }
    }
}
