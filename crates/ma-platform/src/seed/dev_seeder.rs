//! Development Data Seeder
//!
//! Seeds two users and an upcoming meetup in dev mode, and logs session
//! tokens for both users so the API can be exercised without the external
//! auth service.
//!
//! Users:
//!   Organizer: organizer@meetapp.local
//!   Guest:     guest@meetapp.local

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

use crate::auth::TokenService;
use crate::meetup::{Meetup, MeetupStore};
use crate::shared::error::Result;
use crate::user::{User, UserStore};

const TOKEN_TTL_DAYS: i64 = 7;

pub struct DevDataSeeder {
    users: Arc<dyn UserStore>,
    meetups: Arc<dyn MeetupStore>,
    token_service: Arc<TokenService>,
}

impl DevDataSeeder {
    pub fn new(
        users: Arc<dyn UserStore>,
        meetups: Arc<dyn MeetupStore>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self { users, meetups, token_service }
    }

    /// Seed development data. Safe to run on every start.
    pub async fn seed(&self) -> Result<()> {
        info!("=== DEV DATA SEEDER ===");

        let organizer = self.user_if_not_exists("Organizer", "organizer@meetapp.local").await?;
        let guest = self.user_if_not_exists("Guest", "guest@meetapp.local").await?;

        if self.meetups.list_by_owner(&organizer.id).await?.is_empty() {
            let date = Utc::now() + Duration::days(14);
            let meetup = Meetup::new(
                &organizer.id,
                "Rust Meetup",
                "Talks about async Rust",
                "Main Hall",
                date,
            );
            self.meetups.insert(&meetup).await?;
            info!(meetup_id = %meetup.id, "Created meetup: Rust Meetup");
        }

        let ttl = Duration::days(TOKEN_TTL_DAYS);
        info!("Session tokens (valid {} days):", TOKEN_TTL_DAYS);
        info!("  Organizer: {}", self.token_service.issue(&organizer.id, ttl)?);
        info!("  Guest:     {}", self.token_service.issue(&guest.id, ttl)?);
        info!("=======================");

        Ok(())
    }

    async fn user_if_not_exists(&self, name: &str, email: &str) -> Result<User> {
        if let Some(user) = self.users.find_by_email(email).await? {
            return Ok(user);
        }

        let user = User::new(name, email);
        self.users.insert(&user).await?;
        info!(user_id = %user.id, "Created user: {}", email);
        Ok(user)
    }
}
