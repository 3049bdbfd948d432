//! Organizing API

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::file::{FileStore, FileView};
use crate::meetup::api::MeetupResponse;
use crate::meetup::MeetupStore;
use crate::shared::error::{ErrorResponse, PlatformError};
use crate::shared::middleware::Authenticated;
use crate::usecase::{Rejection, UseCaseError};

/// Organized meetup with its banner
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizedMeetupResponse {
    #[serde(flatten)]
    pub meetup: MeetupResponse,
    pub banner: Option<FileView>,
}

/// Organizing service state
#[derive(Clone)]
pub struct OrganizingState {
    pub meetup_repo: Arc<dyn MeetupStore>,
    pub file_repo: Arc<dyn FileStore>,
    /// Prefix for banner URLs
    pub files_base_url: String,
}

/// List the meetups the caller organizes, by date
#[utoipa::path(
    get,
    path = "/organizing",
    tag = "organizing",
    operation_id = "getOrganizing",
    responses(
        (status = 200, description = "Organized meetups", body = Vec<MeetupResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_organizing(
    State(state): State<OrganizingState>,
    auth: Authenticated,
) -> Result<Json<Vec<MeetupResponse>>, PlatformError> {
    let now = auth.execution_context().now();
    let meetups = state.meetup_repo.list_by_owner(&auth.user_id).await?;

    Ok(Json(meetups.iter().map(|m| MeetupResponse::new(m, now)).collect()))
}

/// Show one organized meetup
#[utoipa::path(
    get,
    path = "/organizing/{id}",
    tag = "organizing",
    operation_id = "getOrganizingById",
    params(
        ("id" = String, Path, description = "Meetup ID")
    ),
    responses(
        (status = 200, description = "Meetup found", body = OrganizedMeetupResponse),
        (status = 404, description = "No such meetup organized by the caller", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn show_organizing(
    State(state): State<OrganizingState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<OrganizedMeetupResponse>, PlatformError> {
    let now = auth.execution_context().now();

    let meetup = state.meetup_repo.find_by_id(&id).await?
        .filter(|m| m.is_owned_by(&auth.user_id))
        .ok_or_else(|| UseCaseError::from(Rejection::MeetupNotFound))?;

    let banner = match &meetup.banner_id {
        Some(banner_id) => state.file_repo.find_by_id(banner_id).await?
            .map(|file| file.view(&state.files_base_url)),
        None => None,
    };

    Ok(Json(OrganizedMeetupResponse {
        meetup: MeetupResponse::new(&meetup, now),
        banner,
    }))
}

/// Create organizing router
pub fn organizing_router(state: OrganizingState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_organizing))
        .routes(routes!(show_organizing))
        .with_state(state)
}
