//! Meetapp Platform
//!
//! Meetups and the subscription admission rules:
//! - Subscription admission (self, past, duplicate and same-date checks)
//! - Subscription cancellation and the subscriber's upcoming listing
//! - Organizer-side meetup management
//! - Organizer notifications handed to the outbound job queue
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate contains:
//! - `entity` - Domain entities
//! - `repository` - Store port and its SQLite implementation
//! - `api` - REST endpoints
//! - `operations` - Use case operations (where applicable)

// Aggregates
pub mod user;
pub mod file;
pub mod meetup;
pub mod subscription;
pub mod organizing;

// Authentication
pub mod auth;

// Shared infrastructure
pub mod shared;
pub mod app;

// Cross-cutting concerns
pub mod usecase;
pub mod seed;

pub use shared::error::{PlatformError, Result};
pub use shared::tsid::TsidGenerator;
pub use shared::schema::init_schema;

pub use usecase::{UseCaseResult, UseCaseError, Rejection, ExecutionContext};

pub use app::Platform;
pub use auth::TokenService;

pub use user::entity::User;
pub use file::entity::File;
pub use meetup::entity::{Meetup, MeetupWithOwner};
pub use subscription::entity::{Subscription, SubscriptionWithMeetup};

pub use user::repository::{UserStore, SqliteUserRepository};
pub use file::repository::{FileStore, SqliteFileRepository};
pub use meetup::repository::{MeetupStore, SqliteMeetupRepository};
pub use subscription::repository::{SubscriptionStore, SqliteSubscriptionRepository};
pub use subscription::notification::{NotificationDispatcher, NotificationJob, QueueNotificationDispatcher};
