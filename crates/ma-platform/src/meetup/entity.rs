//! Meetup Entity

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::user::User;

/// A meetup organized by its owner.
///
/// `date` is kept at millisecond precision, the precision it is stored with,
/// so equality between a fresh value and a stored one is exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meetup {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Meetup {
    pub fn new(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now().trunc_subsecs(3);
        Self {
            id: crate::TsidGenerator::generate(),
            owner_id: owner_id.into(),
            title: title.into(),
            description: description.into(),
            location: location.into(),
            date: date.trunc_subsecs(3),
            banner_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_banner(mut self, banner_id: impl Into<String>) -> Self {
        self.banner_id = Some(banner_id.into());
        self
    }

    pub fn set_date(&mut self, date: DateTime<Utc>) {
        self.date = date.trunc_subsecs(3);
    }

    /// A meetup is past once its date is before `now`.
    pub fn is_past_at(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

/// A meetup joined with its organizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetupWithOwner {
    pub meetup: Meetup,
    pub owner: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_past_is_strictly_before_now() {
        let date = Utc.with_ymd_and_hms(2025, 3, 1, 18, 0, 0).unwrap();
        let meetup = Meetup::new("owner", "Rust", "Async talk", "Room 1", date);

        assert!(!meetup.is_past_at(date));
        assert!(!meetup.is_past_at(date - Duration::minutes(1)));
        assert!(meetup.is_past_at(date + Duration::milliseconds(1)));
    }

    #[test]
    fn test_date_truncated_to_millis() {
        let date = Utc.with_ymd_and_hms(2025, 3, 1, 18, 0, 0).unwrap()
            + Duration::nanoseconds(1_234_567);
        let meetup = Meetup::new("owner", "Rust", "Async talk", "Room 1", date);
        assert_eq!(meetup.date.timestamp_subsec_nanos(), 1_000_000);
    }

    #[test]
    fn test_ownership() {
        let meetup = Meetup::new("owner", "Rust", "Async talk", "Room 1", Utc::now());
        assert!(meetup.is_owned_by("owner"));
        assert!(!meetup.is_owned_by("guest"));
    }
}
