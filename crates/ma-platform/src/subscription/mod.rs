//! Subscription Aggregate
//!
//! Subscription admission, cancellation and the subscriber's listing.

pub mod entity;
pub mod repository;
pub mod notification;
pub mod api;
pub mod operations;

pub use entity::{Subscription, SubscriptionWithMeetup};
pub use repository::{SubscriptionStore, SqliteSubscriptionRepository};
pub use notification::{NotificationDispatcher, NotificationJob, QueueNotificationDispatcher};
pub use api::{SubscriptionsState, subscriptions_router};
