//! Create Meetup Use Case

use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::file::FileStore;
use crate::meetup::{Meetup, MeetupStore};
use crate::usecase::{ExecutionContext, Rejection, UseCaseError, UseCaseResult};
use super::events::MeetupCreated;
use super::require_text;

/// Command for creating a meetup. The organizer is the principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetupCommand {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub banner_id: Option<String>,
}

pub struct CreateMeetupUseCase {
    meetups: Arc<dyn MeetupStore>,
    files: Arc<dyn FileStore>,
}

impl CreateMeetupUseCase {
    pub fn new(meetups: Arc<dyn MeetupStore>, files: Arc<dyn FileStore>) -> Self {
        Self { meetups, files }
    }

    pub async fn execute(
        &self,
        command: CreateMeetupCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<MeetupCreated> {
        self.create(command, &ctx).await.into()
    }

    async fn create(
        &self,
        command: CreateMeetupCommand,
        ctx: &ExecutionContext,
    ) -> Result<MeetupCreated, UseCaseError> {
        require_text("title", &command.title)?;
        require_text("description", &command.description)?;
        require_text("location", &command.location)?;

        if command.date < ctx.now() {
            return Err(Rejection::PastDate.into());
        }

        if let Some(banner_id) = &command.banner_id {
            let banner = self.files.find_by_id(banner_id).await
                .map_err(|e| UseCaseError::commit(format!("Failed to fetch banner: {}", e)))?;
            if banner.is_none() {
                return Err(Rejection::BannerNotFound.into());
            }
        }

        let mut meetup = Meetup::new(
            &ctx.principal_id,
            command.title.trim(),
            command.description.trim(),
            command.location.trim(),
            command.date,
        );
        meetup.banner_id = command.banner_id;

        self.meetups.insert(&meetup).await
            .map_err(|e| UseCaseError::commit(format!("Failed to store meetup: {}", e)))?;

        info!(meetup_id = %meetup.id, owner_id = %meetup.owner_id, date = %meetup.date, "Meetup created");
        Ok(MeetupCreated::new(ctx, meetup))
    }
}
