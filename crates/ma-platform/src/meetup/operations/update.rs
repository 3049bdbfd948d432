//! Update Meetup Use Case
//!
//! Moving a meetup must not leave one of its subscribers holding two
//! subscriptions at the same instant.

use std::sync::Arc;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::details;
use crate::file::FileStore;
use crate::meetup::MeetupStore;
use crate::subscription::SubscriptionStore;
use crate::usecase::{ExecutionContext, Rejection, UseCaseError, UseCaseResult};
use super::events::MeetupUpdated;
use super::require_text;

/// Command for changing an upcoming meetup. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeetupCommand {
    pub meetup_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub banner_id: Option<String>,
}

pub struct UpdateMeetupUseCase {
    meetups: Arc<dyn MeetupStore>,
    subscriptions: Arc<dyn SubscriptionStore>,
    files: Arc<dyn FileStore>,
}

impl UpdateMeetupUseCase {
    pub fn new(
        meetups: Arc<dyn MeetupStore>,
        subscriptions: Arc<dyn SubscriptionStore>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        Self { meetups, subscriptions, files }
    }

    pub async fn execute(
        &self,
        command: UpdateMeetupCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<MeetupUpdated> {
        self.update(command, &ctx).await.into()
    }

    async fn update(
        &self,
        command: UpdateMeetupCommand,
        ctx: &ExecutionContext,
    ) -> Result<MeetupUpdated, UseCaseError> {
        let mut meetup = self.meetups.find_by_id(&command.meetup_id).await
            .map_err(|e| UseCaseError::commit(format!("Failed to fetch meetup: {}", e)))?
            .ok_or(Rejection::MeetupNotFound)?;

        if !meetup.is_owned_by(&ctx.principal_id) {
            return Err(Rejection::NotMeetupOwner.into());
        }

        if meetup.is_past_at(ctx.now()) {
            return Err(Rejection::PastMeetup.with_message("Can't edit past meetups"));
        }

        let current_date = meetup.date;

        if let Some(title) = command.title {
            require_text("title", &title)?;
            meetup.title = title.trim().to_string();
        }
        if let Some(description) = command.description {
            require_text("description", &description)?;
            meetup.description = description.trim().to_string();
        }
        if let Some(location) = command.location {
            require_text("location", &location)?;
            meetup.location = location.trim().to_string();
        }

        if let Some(date) = command.date {
            if date < ctx.now() {
                return Err(Rejection::PastDate.into());
            }
            meetup.set_date(date);

            if meetup.date != current_date {
                let conflict = self.subscriptions
                    .find_attendee_conflict(&meetup.id, meetup.date).await
                    .map_err(|e| UseCaseError::commit(format!("Failed to check subscriber schedules: {}", e)))?;
                if let Some(conflict) = conflict {
                    return Err(UseCaseError::business_rule_with_details(
                        Rejection::ScheduleConflict.code(),
                        "A subscriber already attends another meetup at this date",
                        details! { "meetupId" => conflict.meetup_id },
                    ));
                }
            }
        }

        if let Some(banner_id) = command.banner_id {
            let banner = self.files.find_by_id(&banner_id).await
                .map_err(|e| UseCaseError::commit(format!("Failed to fetch banner: {}", e)))?;
            if banner.is_none() {
                return Err(Rejection::BannerNotFound.into());
            }
            meetup.banner_id = Some(banner_id);
        }

        meetup.updated_at = ctx.now().trunc_subsecs(3);
        self.meetups.update(&meetup).await
            .map_err(|e| UseCaseError::commit(format!("Failed to update meetup: {}", e)))?;

        info!(meetup_id = %meetup.id, "Meetup updated");
        Ok(MeetupUpdated::new(ctx, meetup))
    }
}
