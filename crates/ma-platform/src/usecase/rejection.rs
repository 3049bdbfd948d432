//! Meetup domain rejections.
//!
//! The expected refusals of subscription admission and meetup management.
//! Each carries a stable code and the message shown to the user.

use super::error::UseCaseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MeetupNotFound,
    SubscriptionNotFound,
    SubscriberNotFound,
    SelfSubscription,
    PastMeetup,
    AlreadySubscribed,
    ScheduleConflict,
    NotMeetupOwner,
    PastDate,
    BannerNotFound,
}

impl Rejection {
    pub fn code(self) -> &'static str {
        match self {
            Self::MeetupNotFound => "MEETUP_NOT_FOUND",
            Self::SubscriptionNotFound => "SUBSCRIPTION_NOT_FOUND",
            Self::SubscriberNotFound => "SUBSCRIBER_NOT_FOUND",
            Self::SelfSubscription => "SELF_SUBSCRIPTION",
            Self::PastMeetup => "PAST_MEETUP",
            Self::AlreadySubscribed => "ALREADY_SUBSCRIBED",
            Self::ScheduleConflict => "SCHEDULE_CONFLICT",
            Self::NotMeetupOwner => "NOT_MEETUP_OWNER",
            Self::PastDate => "PAST_DATE",
            Self::BannerNotFound => "BANNER_NOT_FOUND",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::MeetupNotFound => "Meetup not found",
            Self::SubscriptionNotFound => "You are not subscribed to this meetup",
            Self::SubscriberNotFound => "User not found",
            Self::SelfSubscription => "Can't subscribe to your own meetups",
            Self::PastMeetup => "Can't subscribe to past meetups",
            Self::AlreadySubscribed => "You are already subscribed for this meetup",
            Self::ScheduleConflict => "Can't subscribe to two meetups at the same time",
            Self::NotMeetupOwner => "Only the organizer can change this meetup",
            Self::PastDate => "Meetup date must be in the future",
            Self::BannerNotFound => "Banner file not found",
        }
    }
}

impl Rejection {
    /// The same rejection with a message worded for another operation.
    pub fn with_message(self, message: impl Into<String>) -> UseCaseError {
        let (code, message) = (self.code(), message.into());
        match self {
            Self::MeetupNotFound | Self::SubscriptionNotFound | Self::SubscriberNotFound => {
                UseCaseError::not_found(code, message)
            }
            Self::SelfSubscription | Self::NotMeetupOwner => UseCaseError::forbidden(code, message),
            Self::PastMeetup | Self::PastDate | Self::BannerNotFound => {
                UseCaseError::validation(code, message)
            }
            Self::AlreadySubscribed | Self::ScheduleConflict => {
                UseCaseError::business_rule(code, message)
            }
        }
    }
}

impl From<Rejection> for UseCaseError {
    fn from(rejection: Rejection) -> Self {
        rejection.with_message(rejection.message())
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Rejection::MeetupNotFound, 404),
            (Rejection::SubscriptionNotFound, 404),
            (Rejection::SelfSubscription, 403),
            (Rejection::PastMeetup, 400),
            (Rejection::AlreadySubscribed, 409),
            (Rejection::ScheduleConflict, 409),
            (Rejection::NotMeetupOwner, 403),
            (Rejection::PastDate, 400),
        ];

        for (rejection, status) in cases {
            let err = UseCaseError::from(rejection);
            assert_eq!(err.http_status_code(), status, "{}", rejection);
            assert_eq!(err.code(), rejection.code());
            assert!(err.is(rejection));
        }
    }

    #[test]
    fn test_with_message_keeps_category() {
        let err = Rejection::PastMeetup.with_message("Can't unsubscribe from past meetups");
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.code(), "PAST_MEETUP");
        assert_eq!(err.message(), "Can't unsubscribe from past meetups");
    }
}
