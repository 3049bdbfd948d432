//! Meetup Events

use serde::{Deserialize, Serialize};

use crate::meetup::Meetup;
use crate::usecase::{EventMetadata, ExecutionContext};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetupCreated {
    #[serde(flatten)]
    pub metadata: EventMetadata,
    pub meetup: Meetup,
}

impl MeetupCreated {
    const EVENT_TYPE: &'static str = "meetapp:meetup:created";

    pub fn new(ctx: &ExecutionContext, meetup: Meetup) -> Self {
        Self {
            metadata: EventMetadata::new(ctx, Self::EVENT_TYPE, format!("meetup.{}", meetup.id)),
            meetup,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetupUpdated {
    #[serde(flatten)]
    pub metadata: EventMetadata,
    pub meetup: Meetup,
}

impl MeetupUpdated {
    const EVENT_TYPE: &'static str = "meetapp:meetup:updated";

    pub fn new(ctx: &ExecutionContext, meetup: Meetup) -> Self {
        Self {
            metadata: EventMetadata::new(ctx, Self::EVENT_TYPE, format!("meetup.{}", meetup.id)),
            meetup,
        }
    }
}

/// The organizer called a meetup off; its subscriptions went with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetupCancelled {
    #[serde(flatten)]
    pub metadata: EventMetadata,
    pub meetup_id: String,
    pub title: String,
}

impl MeetupCancelled {
    const EVENT_TYPE: &'static str = "meetapp:meetup:cancelled";

    pub fn new(ctx: &ExecutionContext, meetup_id: &str, title: &str) -> Self {
        Self {
            metadata: EventMetadata::new(ctx, Self::EVENT_TYPE, format!("meetup.{}", meetup_id)),
            meetup_id: meetup_id.to_string(),
            title: title.to_string(),
        }
    }
}
