//! Admit Subscription Use Case
//!
//! Decides whether a user may subscribe to a meetup. Checks run in a fixed
//! order and the first failure wins:
//!
//! 1. the meetup exists
//! 2. the subscriber is not its organizer
//! 3. the meetup is not past
//! 4. the subscriber is not already subscribed
//! 5. the subscriber has no other subscription at the exact same date
//!
//! An admitted subscription is stored and the organizer is notified. A
//! failed or stalled notification hand-off is logged and does not undo the
//! admission.

use std::sync::Arc;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::details;
use crate::meetup::MeetupStore;
use crate::shared::error::PlatformError;
use crate::subscription::{NotificationDispatcher, NotificationJob, Subscription, SubscriptionStore};
use crate::user::UserStore;
use crate::usecase::{ExecutionContext, Rejection, UseCaseError, UseCaseResult};
use super::events::SubscriptionAdmitted;

/// Command for subscribing to a meetup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmitSubscriptionCommand {
    pub subscriber_id: String,
    pub meetup_id: String,
}

/// Upper bound on handing the organizer mail to the queue
const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(2);

pub struct AdmitSubscriptionUseCase {
    meetups: Arc<dyn MeetupStore>,
    subscriptions: Arc<dyn SubscriptionStore>,
    users: Arc<dyn UserStore>,
    notifications: Arc<dyn NotificationDispatcher>,
    notification_timeout: Duration,
}

impl AdmitSubscriptionUseCase {
    pub fn new(
        meetups: Arc<dyn MeetupStore>,
        subscriptions: Arc<dyn SubscriptionStore>,
        users: Arc<dyn UserStore>,
        notifications: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            meetups,
            subscriptions,
            users,
            notifications,
            notification_timeout: NOTIFICATION_TIMEOUT,
        }
    }

    pub fn with_notification_timeout(mut self, timeout: Duration) -> Self {
        self.notification_timeout = timeout;
        self
    }

    pub async fn execute(
        &self,
        command: AdmitSubscriptionCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<SubscriptionAdmitted> {
        let result = self.evaluate(&command, &ctx).await;

        if let Err(err) = &result {
            debug!(
                subscriber_id = %command.subscriber_id,
                meetup_id = %command.meetup_id,
                code = %err.code(),
                "Subscription rejected"
            );
        }

        result.into()
    }

    async fn evaluate(
        &self,
        command: &AdmitSubscriptionCommand,
        ctx: &ExecutionContext,
    ) -> Result<SubscriptionAdmitted, UseCaseError> {
        let meetup = self.meetups.find_with_owner(&command.meetup_id).await
            .map_err(|e| UseCaseError::commit(format!("Failed to fetch meetup: {}", e)))?
            .ok_or(Rejection::MeetupNotFound)?;

        if meetup.meetup.is_owned_by(&command.subscriber_id) {
            return Err(Rejection::SelfSubscription.into());
        }

        if meetup.meetup.is_past_at(ctx.now()) {
            return Err(Rejection::PastMeetup.into());
        }

        let existing = self.subscriptions
            .find_by_user_and_meetup(&command.subscriber_id, &command.meetup_id).await
            .map_err(|e| UseCaseError::commit(format!("Failed to fetch subscription: {}", e)))?;
        if existing.is_some() {
            return Err(Rejection::AlreadySubscribed.into());
        }

        let same_date = self.subscriptions
            .find_by_user_on_date(&command.subscriber_id, meetup.meetup.date).await
            .map_err(|e| UseCaseError::commit(format!("Failed to fetch subscriptions: {}", e)))?;
        if let Some(conflict) = same_date {
            return Err(UseCaseError::business_rule_with_details(
                Rejection::ScheduleConflict.code(),
                Rejection::ScheduleConflict.message(),
                details! { "meetupId" => conflict.meetup_id },
            ));
        }

        let subscriber = self.users.find_by_id(&command.subscriber_id).await
            .map_err(|e| UseCaseError::commit(format!("Failed to fetch user: {}", e)))?
            .ok_or(Rejection::SubscriberNotFound)?;

        let subscription = Subscription::new(&subscriber.id, &meetup.meetup.id, ctx.now());
        match self.subscriptions.insert(&subscription).await {
            Ok(()) => {}
            // A concurrent request stored the same pair first
            Err(PlatformError::Duplicate { .. }) => return Err(Rejection::AlreadySubscribed.into()),
            Err(e) => {
                return Err(UseCaseError::commit(format!("Failed to store subscription: {}", e)));
            }
        }

        let job = NotificationJob::subscription_mail(&meetup, &subscriber);
        let enqueued = tokio::time::timeout(self.notification_timeout, self.notifications.enqueue(job)).await;
        let notification_id = match enqueued {
            Ok(Ok(id)) => Some(id),
            Ok(Err(e)) => {
                warn!(
                    subscription_id = %subscription.id,
                    meetup_id = %meetup.meetup.id,
                    error = %e,
                    "Failed to enqueue subscription mail"
                );
                None
            }
            Err(_) => {
                warn!(
                    subscription_id = %subscription.id,
                    meetup_id = %meetup.meetup.id,
                    timeout_ms = self.notification_timeout.as_millis() as u64,
                    "Timed out enqueueing subscription mail"
                );
                None
            }
        };

        info!(
            subscription_id = %subscription.id,
            subscriber_id = %subscriber.id,
            meetup_id = %meetup.meetup.id,
            "Subscription admitted"
        );

        Ok(SubscriptionAdmitted::new(ctx, subscription, notification_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serialization() {
        let cmd = AdmitSubscriptionCommand {
            subscriber_id: "u1".to_string(),
            meetup_id: "m1".to_string(),
        };

        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("subscriberId"));
        assert!(json.contains("meetupId"));
    }
}
