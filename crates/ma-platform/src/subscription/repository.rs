//! Subscription Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::debug;

use super::entity::{Subscription, SubscriptionWithMeetup};
use crate::meetup::repository::{SqliteMeetupRepository, MEETUP_COLUMNS, OWNER_COLUMNS};
use crate::shared::api_common::PaginationParams;
use crate::shared::error::Result;
use crate::shared::schema::{from_millis, map_unique_violation};

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn find_by_user_and_meetup(&self, user_id: &str, meetup_id: &str) -> Result<Option<Subscription>>;

    /// A subscription of `user_id` to any meetup whose date equals `date`.
    async fn find_by_user_on_date(&self, user_id: &str, date: DateTime<Utc>) -> Result<Option<Subscription>>;

    /// A subscription that some subscriber of `meetup_id` holds to another
    /// meetup dated `date`.
    async fn find_attendee_conflict(&self, meetup_id: &str, date: DateTime<Utc>) -> Result<Option<Subscription>>;

    /// One page of the user's subscriptions to meetups dated after `now`,
    /// ordered by meetup date, with the total count.
    async fn list_upcoming_for_user(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        pagination: &PaginationParams,
    ) -> Result<(Vec<SubscriptionWithMeetup>, u64)>;

    /// Fails with `PlatformError::Duplicate` if the (user, meetup) pair exists.
    async fn insert(&self, subscription: &Subscription) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<bool>;
}

pub struct SqliteSubscriptionRepository {
    pool: SqlitePool,
}

impl SqliteSubscriptionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn parse_row(row: &SqliteRow) -> Result<Subscription> {
        Ok(Subscription {
            id: row.get("id"),
            user_id: row.get("user_id"),
            meetup_id: row.get("meetup_id"),
            created_at: from_millis("created_at", row.get("created_at"))?,
        })
    }

    fn parse_with_meetup(row: &SqliteRow) -> Result<SubscriptionWithMeetup> {
        let subscription = Subscription {
            id: row.get("subscription_id"),
            user_id: row.get("subscription_user_id"),
            meetup_id: row.get("id"),
            created_at: from_millis("subscription_created_at", row.get("subscription_created_at"))?,
        };
        Ok(SubscriptionWithMeetup {
            subscription,
            meetup: SqliteMeetupRepository::parse_with_owner(row)?,
        })
    }
}

#[async_trait]
impl SubscriptionStore for SqliteSubscriptionRepository {
    async fn find_by_user_and_meetup(&self, user_id: &str, meetup_id: &str) -> Result<Option<Subscription>> {
        let row = sqlx::query(
            "SELECT id, user_id, meetup_id, created_at FROM subscriptions WHERE user_id = ? AND meetup_id = ?",
        )
        .bind(user_id)
        .bind(meetup_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(Self::parse_row).transpose()
    }

    async fn find_by_user_on_date(&self, user_id: &str, date: DateTime<Utc>) -> Result<Option<Subscription>> {
        let row = sqlx::query(
            r#"
            SELECT s.id, s.user_id, s.meetup_id, s.created_at
            FROM subscriptions s
            JOIN meetups m ON m.id = s.meetup_id
            WHERE s.user_id = ? AND m.date = ?
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(date.timestamp_millis())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(Self::parse_row).transpose()
    }

    async fn find_attendee_conflict(&self, meetup_id: &str, date: DateTime<Utc>) -> Result<Option<Subscription>> {
        let row = sqlx::query(
            r#"
            SELECT o.id, o.user_id, o.meetup_id, o.created_at
            FROM subscriptions s
            JOIN subscriptions o ON o.user_id = s.user_id AND o.meetup_id <> s.meetup_id
            JOIN meetups m ON m.id = o.meetup_id
            WHERE s.meetup_id = ? AND m.date = ?
            LIMIT 1
            "#,
        )
        .bind(meetup_id)
        .bind(date.timestamp_millis())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(Self::parse_row).transpose()
    }

    async fn list_upcoming_for_user(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        pagination: &PaginationParams,
    ) -> Result<(Vec<SubscriptionWithMeetup>, u64)> {
        let now = now.timestamp_millis();

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM subscriptions s
            JOIN meetups m ON m.id = s.meetup_id
            WHERE s.user_id = ? AND m.date > ?
            "#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        let query = format!(
            "SELECT s.id AS subscription_id, s.user_id AS subscription_user_id, \
             s.created_at AS subscription_created_at, {}, {} \
             FROM subscriptions s \
             JOIN meetups m ON m.id = s.meetup_id \
             JOIN users u ON u.id = m.owner_id \
             WHERE s.user_id = ? AND m.date > ? \
             ORDER BY m.date ASC, m.id ASC LIMIT ? OFFSET ?",
            MEETUP_COLUMNS, OWNER_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(now)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let items = rows.iter().map(Self::parse_with_meetup).collect::<Result<Vec<_>>>()?;
        debug!(user_id = %user_id, count = items.len(), total, "Listed upcoming subscriptions");
        Ok((items, total as u64))
    }

    async fn insert(&self, subscription: &Subscription) -> Result<()> {
        sqlx::query("INSERT INTO subscriptions (id, user_id, meetup_id, created_at) VALUES (?, ?, ?, ?)")
            .bind(&subscription.id)
            .bind(&subscription.user_id)
            .bind(&subscription.meetup_id)
            .bind(subscription.created_at.timestamp_millis())
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "Subscription", "meetupId", &subscription.meetup_id))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
