//! Cancel Meetup Use Case

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::meetup::MeetupStore;
use crate::usecase::{ExecutionContext, Rejection, UseCaseError, UseCaseResult};
use super::events::MeetupCancelled;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelMeetupCommand {
    pub meetup_id: String,
}

/// Deletes an upcoming meetup together with its subscriptions.
pub struct CancelMeetupUseCase {
    meetups: Arc<dyn MeetupStore>,
}

impl CancelMeetupUseCase {
    pub fn new(meetups: Arc<dyn MeetupStore>) -> Self {
        Self { meetups }
    }

    pub async fn execute(
        &self,
        command: CancelMeetupCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<MeetupCancelled> {
        let meetup = match self.meetups.find_by_id(&command.meetup_id).await {
            Ok(Some(m)) => m,
            Ok(None) => return UseCaseResult::failure(Rejection::MeetupNotFound.into()),
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch meetup: {}",
                    e
                )));
            }
        };

        if !meetup.is_owned_by(&ctx.principal_id) {
            return UseCaseResult::failure(Rejection::NotMeetupOwner.into());
        }

        if meetup.is_past_at(ctx.now()) {
            return UseCaseResult::failure(
                Rejection::PastMeetup.with_message("Can't cancel past meetups"),
            );
        }

        match self.meetups.delete(&meetup.id).await {
            Ok(true) => {}
            Ok(false) => return UseCaseResult::failure(Rejection::MeetupNotFound.into()),
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to delete meetup: {}",
                    e
                )));
            }
        }

        info!(meetup_id = %meetup.id, owner_id = %meetup.owner_id, "Meetup cancelled");
        UseCaseResult::success(MeetupCancelled::new(&ctx, &meetup.id, &meetup.title))
    }
}
