//! Cancel Subscription Use Case

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::meetup::MeetupStore;
use crate::subscription::SubscriptionStore;
use crate::usecase::{ExecutionContext, Rejection, UseCaseError, UseCaseResult};
use super::events::SubscriptionCancelled;

/// Command for leaving a meetup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelSubscriptionCommand {
    pub subscriber_id: String,
    pub meetup_id: String,
}

/// Removes a subscription while its meetup is still upcoming.
pub struct CancelSubscriptionUseCase {
    meetups: Arc<dyn MeetupStore>,
    subscriptions: Arc<dyn SubscriptionStore>,
}

impl CancelSubscriptionUseCase {
    pub fn new(meetups: Arc<dyn MeetupStore>, subscriptions: Arc<dyn SubscriptionStore>) -> Self {
        Self { meetups, subscriptions }
    }

    pub async fn execute(
        &self,
        command: CancelSubscriptionCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<SubscriptionCancelled> {
        let subscription = match self.subscriptions
            .find_by_user_and_meetup(&command.subscriber_id, &command.meetup_id).await
        {
            Ok(Some(s)) => s,
            Ok(None) => return self.reject(&command, Rejection::SubscriptionNotFound.into()),
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch subscription: {}",
                    e
                )));
            }
        };

        let meetup = match self.meetups.find_by_id(&subscription.meetup_id).await {
            Ok(Some(m)) => m,
            Ok(None) => return self.reject(&command, Rejection::MeetupNotFound.into()),
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch meetup: {}",
                    e
                )));
            }
        };

        if meetup.is_past_at(ctx.now()) {
            return self.reject(
                &command,
                Rejection::PastMeetup.with_message("Can't unsubscribe from past meetups"),
            );
        }

        if let Err(e) = self.subscriptions.delete(&subscription.id).await {
            return UseCaseResult::failure(UseCaseError::commit(format!(
                "Failed to delete subscription: {}",
                e
            )));
        }

        info!(
            subscription_id = %subscription.id,
            subscriber_id = %command.subscriber_id,
            meetup_id = %meetup.id,
            "Subscription cancelled"
        );

        UseCaseResult::success(SubscriptionCancelled::new(&ctx, &subscription.id, &meetup.id))
    }

    fn reject(
        &self,
        command: &CancelSubscriptionCommand,
        error: UseCaseError,
    ) -> UseCaseResult<SubscriptionCancelled> {
        debug!(
            subscriber_id = %command.subscriber_id,
            meetup_id = %command.meetup_id,
            code = %error.code(),
            "Cancellation rejected"
        );
        UseCaseResult::failure(error)
    }
}
