//! Subscription Entity
//!
//! A user's registration to attend a meetup.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::meetup::MeetupWithOwner;

/// At most one subscription exists per (user_id, meetup_id); a user holds
/// at most one subscription among meetups sharing the same date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub user_id: String,
    pub meetup_id: String,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(user_id: impl Into<String>, meetup_id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: crate::TsidGenerator::generate(),
            user_id: user_id.into(),
            meetup_id: meetup_id.into(),
            created_at: created_at.trunc_subsecs(3),
        }
    }
}

/// A subscription joined with its meetup and the meetup's organizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionWithMeetup {
    pub subscription: Subscription,
    pub meetup: MeetupWithOwner,
}
