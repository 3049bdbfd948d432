//! Meetups API
//!
//! Browsing meetups and the organizer's create/update/cancel endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::meetup::operations::{
    CancelMeetupCommand, CancelMeetupUseCase, CreateMeetupCommand, CreateMeetupUseCase,
    UpdateMeetupCommand, UpdateMeetupUseCase,
};
use crate::meetup::{Meetup, MeetupStore, MeetupWithOwner};
use crate::shared::api_common::{PaginatedResponse, PaginationParams};
use crate::shared::error::{ErrorResponse, PlatformError};
use crate::shared::middleware::Authenticated;

/// Organizer projection
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponse {
    pub id: String,
    pub name: String,
}

/// Meetup response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetupResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    /// True once the meetup date has passed
    pub past: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MeetupResponse {
    pub fn new(meetup: &Meetup, now: DateTime<Utc>) -> Self {
        Self {
            id: meetup.id.clone(),
            title: meetup.title.clone(),
            description: meetup.description.clone(),
            location: meetup.location.clone(),
            date: meetup.date,
            past: meetup.is_past_at(now),
            banner_id: meetup.banner_id.clone(),
            owner: None,
            created_at: meetup.created_at,
            updated_at: meetup.updated_at,
        }
    }

    pub fn with_owner(item: &MeetupWithOwner, now: DateTime<Utc>) -> Self {
        Self {
            owner: Some(OwnerResponse {
                id: item.owner.id.clone(),
                name: item.owner.name.clone(),
            }),
            ..Self::new(&item.meetup, now)
        }
    }
}

/// Create meetup request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetupRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    /// Must be in the future
    pub date: DateTime<Utc>,
    /// ID of an uploaded banner file
    #[serde(default)]
    pub banner_id: Option<String>,
}

/// Update meetup request; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeetupRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub banner_id: Option<String>,
}

/// Query parameters for browsing meetups
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MeetupsQuery {
    /// UTC calendar day (YYYY-MM-DD); all days when omitted
    pub date: Option<NaiveDate>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Meetups service state
#[derive(Clone)]
pub struct MeetupsState {
    pub meetup_repo: Arc<dyn MeetupStore>,
    pub create_use_case: Arc<CreateMeetupUseCase>,
    pub update_use_case: Arc<UpdateMeetupUseCase>,
    pub cancel_use_case: Arc<CancelMeetupUseCase>,
}

/// Browse meetups
#[utoipa::path(
    get,
    path = "/meetups",
    tag = "meetups",
    operation_id = "getMeetups",
    params(MeetupsQuery),
    responses(
        (status = 200, description = "Meetups on the requested day", body = PaginatedResponse<MeetupResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn browse_meetups(
    State(state): State<MeetupsState>,
    auth: Authenticated,
    Query(query): Query<MeetupsQuery>,
) -> Result<Json<PaginatedResponse<MeetupResponse>>, PlatformError> {
    let now = auth.execution_context().now();
    let (items, total) = state.meetup_repo.list_on_day(query.date, &query.pagination).await?;

    let data = items.iter().map(|m| MeetupResponse::with_owner(m, now)).collect();
    Ok(Json(PaginatedResponse::new(data, &query.pagination, total)))
}

/// Create a meetup organized by the caller
#[utoipa::path(
    post,
    path = "/meetups",
    tag = "meetups",
    operation_id = "postMeetups",
    request_body = CreateMeetupRequest,
    responses(
        (status = 201, description = "Meetup created", body = MeetupResponse),
        (status = 400, description = "Validation error or date in the past", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_meetup(
    State(state): State<MeetupsState>,
    auth: Authenticated,
    Json(req): Json<CreateMeetupRequest>,
) -> Result<(StatusCode, Json<MeetupResponse>), PlatformError> {
    let ctx = auth.execution_context();
    let now = ctx.now();

    let command = CreateMeetupCommand {
        title: req.title,
        description: req.description,
        location: req.location,
        date: req.date,
        banner_id: req.banner_id,
    };
    let event = state.create_use_case.execute(command, ctx).await.into_result()?;

    Ok((StatusCode::CREATED, Json(MeetupResponse::new(&event.meetup, now))))
}

/// Update an upcoming meetup
#[utoipa::path(
    put,
    path = "/meetups/{id}",
    tag = "meetups",
    operation_id = "putMeetupsById",
    params(
        ("id" = String, Path, description = "Meetup ID")
    ),
    request_body = UpdateMeetupRequest,
    responses(
        (status = 200, description = "Meetup updated", body = MeetupResponse),
        (status = 400, description = "Past meetup, past date or validation error", body = ErrorResponse),
        (status = 403, description = "Caller is not the organizer", body = ErrorResponse),
        (status = 404, description = "Meetup not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_meetup(
    State(state): State<MeetupsState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<UpdateMeetupRequest>,
) -> Result<Json<MeetupResponse>, PlatformError> {
    let ctx = auth.execution_context();
    let now = ctx.now();

    let command = UpdateMeetupCommand {
        meetup_id: id,
        title: req.title,
        description: req.description,
        location: req.location,
        date: req.date,
        banner_id: req.banner_id,
    };
    let event = state.update_use_case.execute(command, ctx).await.into_result()?;

    Ok(Json(MeetupResponse::new(&event.meetup, now)))
}

/// Cancel an upcoming meetup and drop its subscriptions
#[utoipa::path(
    delete,
    path = "/meetups/{id}",
    tag = "meetups",
    operation_id = "deleteMeetupsById",
    params(
        ("id" = String, Path, description = "Meetup ID")
    ),
    responses(
        (status = 204, description = "Meetup cancelled"),
        (status = 400, description = "Meetup already happened", body = ErrorResponse),
        (status = 403, description = "Caller is not the organizer", body = ErrorResponse),
        (status = 404, description = "Meetup not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel_meetup(
    State(state): State<MeetupsState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<StatusCode, PlatformError> {
    let command = CancelMeetupCommand { meetup_id: id };
    state.cancel_use_case.execute(command, auth.execution_context()).await.into_result()?;

    Ok(StatusCode::NO_CONTENT)
}

/// Create meetups router
pub fn meetups_router(state: MeetupsState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(browse_meetups, create_meetup))
        .routes(routes!(update_meetup, cancel_meetup))
        .with_state(state)
}
