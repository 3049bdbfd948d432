//! Meetup Repository

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::debug;

use super::entity::{Meetup, MeetupWithOwner};
use crate::shared::api_common::PaginationParams;
use crate::shared::error::Result;
use crate::shared::schema::from_millis;
use crate::user::User;

#[async_trait]
pub trait MeetupStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Meetup>>;
    async fn find_with_owner(&self, id: &str) -> Result<Option<MeetupWithOwner>>;
    /// All meetups of an organizer, ordered by date.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Meetup>>;
    /// One page of meetups on the given UTC day (every day when `None`),
    /// ordered by date, with the total count.
    async fn list_on_day(
        &self,
        day: Option<NaiveDate>,
        pagination: &PaginationParams,
    ) -> Result<(Vec<MeetupWithOwner>, u64)>;
    async fn insert(&self, meetup: &Meetup) -> Result<()>;
    async fn update(&self, meetup: &Meetup) -> Result<()>;
    /// Delete a meetup and its subscriptions. Returns false if it did not exist.
    async fn delete(&self, id: &str) -> Result<bool>;
}

pub(crate) const MEETUP_COLUMNS: &str =
    "m.id, m.owner_id, m.title, m.description, m.location, m.date, m.banner_id, m.created_at, m.updated_at";

pub(crate) const OWNER_COLUMNS: &str =
    "u.name AS owner_name, u.email AS owner_email, u.created_at AS owner_created_at";

pub struct SqliteMeetupRepository {
    pool: SqlitePool,
}

impl SqliteMeetupRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(crate) fn parse_meetup(row: &SqliteRow) -> Result<Meetup> {
        Ok(Meetup {
            id: row.get("id"),
            owner_id: row.get("owner_id"),
            title: row.get("title"),
            description: row.get("description"),
            location: row.get("location"),
            date: from_millis("date", row.get("date"))?,
            banner_id: row.get("banner_id"),
            created_at: from_millis("created_at", row.get("created_at"))?,
            updated_at: from_millis("updated_at", row.get("updated_at"))?,
        })
    }

    /// Parse a row selected with `MEETUP_COLUMNS` and `OWNER_COLUMNS`.
    pub(crate) fn parse_with_owner(row: &SqliteRow) -> Result<MeetupWithOwner> {
        let meetup = Self::parse_meetup(row)?;
        let owner = User {
            id: meetup.owner_id.clone(),
            name: row.get("owner_name"),
            email: row.get("owner_email"),
            created_at: from_millis("owner_created_at", row.get("owner_created_at"))?,
        };
        Ok(MeetupWithOwner { meetup, owner })
    }

    fn day_bounds(day: NaiveDate) -> (i64, i64) {
        let start: DateTime<Utc> = day.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = start + Duration::days(1);
        (start.timestamp_millis(), end.timestamp_millis())
    }
}

#[async_trait]
impl MeetupStore for SqliteMeetupRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Meetup>> {
        let query = format!("SELECT {} FROM meetups m WHERE m.id = ?", MEETUP_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::parse_meetup).transpose()
    }

    async fn find_with_owner(&self, id: &str) -> Result<Option<MeetupWithOwner>> {
        let query = format!(
            "SELECT {}, {} FROM meetups m JOIN users u ON u.id = m.owner_id WHERE m.id = ?",
            MEETUP_COLUMNS, OWNER_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::parse_with_owner).transpose()
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Meetup>> {
        let query = format!(
            "SELECT {} FROM meetups m WHERE m.owner_id = ? ORDER BY m.date ASC",
            MEETUP_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::parse_meetup).collect()
    }

    async fn list_on_day(
        &self,
        day: Option<NaiveDate>,
        pagination: &PaginationParams,
    ) -> Result<(Vec<MeetupWithOwner>, u64)> {
        let (start, end) = day.map(Self::day_bounds).unwrap_or((i64::MIN, i64::MAX));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM meetups WHERE date >= ? AND date < ?",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        let query = format!(
            "SELECT {}, {} FROM meetups m JOIN users u ON u.id = m.owner_id \
             WHERE m.date >= ? AND m.date < ? ORDER BY m.date ASC, m.id ASC LIMIT ? OFFSET ?",
            MEETUP_COLUMNS, OWNER_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(start)
            .bind(end)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let items = rows.iter().map(Self::parse_with_owner).collect::<Result<Vec<_>>>()?;
        debug!(?day, count = items.len(), total, "Listed meetups");
        Ok((items, total as u64))
    }

    async fn insert(&self, meetup: &Meetup) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO meetups (id, owner_id, title, description, location, date, banner_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&meetup.id)
        .bind(&meetup.owner_id)
        .bind(&meetup.title)
        .bind(&meetup.description)
        .bind(&meetup.location)
        .bind(meetup.date.timestamp_millis())
        .bind(&meetup.banner_id)
        .bind(meetup.created_at.timestamp_millis())
        .bind(meetup.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, meetup: &Meetup) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE meetups
            SET title = ?, description = ?, location = ?, date = ?, banner_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&meetup.title)
        .bind(&meetup.description)
        .bind(&meetup.location)
        .bind(meetup.date.timestamp_millis())
        .bind(&meetup.banner_id)
        .bind(meetup.updated_at.timestamp_millis())
        .bind(&meetup.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let subscriptions = sqlx::query("DELETE FROM subscriptions WHERE meetup_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM meetups WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        debug!(meetup_id = %id, subscriptions, "Meetup deleted");
        Ok(deleted > 0)
    }
}
