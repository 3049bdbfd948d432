//! Subscriptions API
//!
//! The caller's upcoming subscriptions, and subscribing to or leaving a
//! meetup.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::meetup::api::MeetupResponse;
use crate::shared::api_common::{PaginatedResponse, PaginationParams};
use crate::shared::error::{ErrorResponse, PlatformError};
use crate::shared::middleware::Authenticated;
use crate::subscription::operations::{
    AdmitSubscriptionCommand, AdmitSubscriptionUseCase, CancelSubscriptionCommand,
    CancelSubscriptionUseCase,
};
use crate::subscription::{Subscription, SubscriptionStore, SubscriptionWithMeetup};

/// Subscription as returned from admission
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionCreatedResponse {
    pub id: String,
    pub user_id: String,
    pub meetup_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<Subscription> for SubscriptionCreatedResponse {
    fn from(s: Subscription) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            meetup_id: s.meetup_id,
            created_at: s.created_at,
        }
    }
}

/// Upcoming subscription with its meetup and organizer
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub meetup: MeetupResponse,
}

impl SubscriptionResponse {
    fn new(item: &SubscriptionWithMeetup, now: DateTime<Utc>) -> Self {
        Self {
            id: item.subscription.id.clone(),
            created_at: item.subscription.created_at,
            meetup: MeetupResponse::with_owner(&item.meetup, now),
        }
    }
}

/// Subscriptions service state
#[derive(Clone)]
pub struct SubscriptionsState {
    pub subscription_repo: Arc<dyn SubscriptionStore>,
    pub admit_use_case: Arc<AdmitSubscriptionUseCase>,
    pub cancel_use_case: Arc<CancelSubscriptionUseCase>,
}

/// List the caller's upcoming subscriptions, soonest first
#[utoipa::path(
    get,
    path = "/subscriptions",
    tag = "subscriptions",
    operation_id = "getSubscriptions",
    params(PaginationParams),
    responses(
        (status = 200, description = "Upcoming subscriptions", body = PaginatedResponse<SubscriptionResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_subscriptions(
    State(state): State<SubscriptionsState>,
    auth: Authenticated,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<SubscriptionResponse>>, PlatformError> {
    let now = auth.execution_context().now();
    let (items, total) = state.subscription_repo
        .list_upcoming_for_user(&auth.user_id, now, &pagination)
        .await?;

    let data = items.iter().map(|s| SubscriptionResponse::new(s, now)).collect();
    Ok(Json(PaginatedResponse::new(data, &pagination, total)))
}

/// Subscribe the caller to a meetup
#[utoipa::path(
    post,
    path = "/meetups/{id}/subscriptions",
    tag = "subscriptions",
    operation_id = "postMeetupsByIdSubscriptions",
    params(
        ("id" = String, Path, description = "Meetup ID")
    ),
    responses(
        (status = 201, description = "Subscription admitted", body = SubscriptionCreatedResponse),
        (status = 400, description = "Meetup already happened", body = ErrorResponse),
        (status = 403, description = "Caller organizes this meetup", body = ErrorResponse),
        (status = 404, description = "Meetup not found", body = ErrorResponse),
        (status = 409, description = "Already subscribed, or subscribed to another meetup at the same time", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn subscribe(
    State(state): State<SubscriptionsState>,
    auth: Authenticated,
    Path(meetup_id): Path<String>,
) -> Result<(StatusCode, Json<SubscriptionCreatedResponse>), PlatformError> {
    let command = AdmitSubscriptionCommand {
        subscriber_id: auth.user_id.clone(),
        meetup_id,
    };
    let event = state.admit_use_case.execute(command, auth.execution_context()).await.into_result()?;

    Ok((StatusCode::CREATED, Json(event.subscription.into())))
}

/// Leave an upcoming meetup
#[utoipa::path(
    delete,
    path = "/meetups/{id}/subscriptions",
    tag = "subscriptions",
    operation_id = "deleteMeetupsByIdSubscriptions",
    params(
        ("id" = String, Path, description = "Meetup ID")
    ),
    responses(
        (status = 204, description = "Subscription cancelled"),
        (status = 400, description = "Meetup already happened", body = ErrorResponse),
        (status = 404, description = "Not subscribed to this meetup", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn unsubscribe(
    State(state): State<SubscriptionsState>,
    auth: Authenticated,
    Path(meetup_id): Path<String>,
) -> Result<StatusCode, PlatformError> {
    let command = CancelSubscriptionCommand {
        subscriber_id: auth.user_id.clone(),
        meetup_id,
    };
    state.cancel_use_case.execute(command, auth.execution_context()).await.into_result()?;

    Ok(StatusCode::NO_CONTENT)
}

/// Create subscriptions router
pub fn subscriptions_router(state: SubscriptionsState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_subscriptions))
        .routes(routes!(subscribe, unsubscribe))
        .with_state(state)
}
