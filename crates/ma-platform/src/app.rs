//! Platform wiring
//!
//! Builds the stores, use cases and routers of the platform from one
//! SQLite pool and a notification dispatcher.

use sqlx::SqlitePool;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

use crate::file::{FileStore, SqliteFileRepository};
use crate::meetup::operations::{CancelMeetupUseCase, CreateMeetupUseCase, UpdateMeetupUseCase};
use crate::meetup::{meetups_router, MeetupStore, MeetupsState, SqliteMeetupRepository};
use crate::organizing::{organizing_router, OrganizingState};
use crate::subscription::operations::{AdmitSubscriptionUseCase, CancelSubscriptionUseCase};
use crate::subscription::{
    subscriptions_router, NotificationDispatcher, SqliteSubscriptionRepository, SubscriptionStore,
    SubscriptionsState,
};
use crate::user::{SqliteUserRepository, UserStore};

/// The platform's ports. Swap any of them to run the routers against
/// other implementations.
#[derive(Clone)]
pub struct Platform {
    pub meetups: Arc<dyn MeetupStore>,
    pub subscriptions: Arc<dyn SubscriptionStore>,
    pub users: Arc<dyn UserStore>,
    pub files: Arc<dyn FileStore>,
    pub notifications: Arc<dyn NotificationDispatcher>,
    pub files_base_url: String,
}

impl Platform {
    /// SQLite-backed stores sharing one pool.
    pub fn sqlite(
        pool: SqlitePool,
        notifications: Arc<dyn NotificationDispatcher>,
        files_base_url: impl Into<String>,
    ) -> Self {
        Self {
            meetups: Arc::new(SqliteMeetupRepository::new(pool.clone())),
            subscriptions: Arc::new(SqliteSubscriptionRepository::new(pool.clone())),
            users: Arc::new(SqliteUserRepository::new(pool.clone())),
            files: Arc::new(SqliteFileRepository::new(pool)),
            notifications,
            files_base_url: files_base_url.into(),
        }
    }

    pub fn admit_subscription(&self) -> AdmitSubscriptionUseCase {
        AdmitSubscriptionUseCase::new(
            self.meetups.clone(),
            self.subscriptions.clone(),
            self.users.clone(),
            self.notifications.clone(),
        )
    }

    pub fn cancel_subscription(&self) -> CancelSubscriptionUseCase {
        CancelSubscriptionUseCase::new(self.meetups.clone(), self.subscriptions.clone())
    }

    /// All platform endpoints, with their OpenAPI paths collected.
    pub fn router(&self) -> OpenApiRouter {
        let subscriptions_state = SubscriptionsState {
            subscription_repo: self.subscriptions.clone(),
            admit_use_case: Arc::new(self.admit_subscription()),
            cancel_use_case: Arc::new(self.cancel_subscription()),
        };

        let meetups_state = MeetupsState {
            meetup_repo: self.meetups.clone(),
            create_use_case: Arc::new(CreateMeetupUseCase::new(self.meetups.clone(), self.files.clone())),
            update_use_case: Arc::new(UpdateMeetupUseCase::new(
                self.meetups.clone(),
                self.subscriptions.clone(),
                self.files.clone(),
            )),
            cancel_use_case: Arc::new(CancelMeetupUseCase::new(self.meetups.clone())),
        };

        let organizing_state = OrganizingState {
            meetup_repo: self.meetups.clone(),
            file_repo: self.files.clone(),
            files_base_url: self.files_base_url.clone(),
        };

        OpenApiRouter::new()
            .merge(subscriptions_router(subscriptions_state))
            .merge(meetups_router(meetups_state))
            .merge(organizing_router(organizing_state))
    }
}
