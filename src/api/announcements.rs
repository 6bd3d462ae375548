use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_record_id;
use super::{AnnouncementDto, ApiError, ApiResponse, AppState};
use crate::services::AnnouncementError;

impl From<AnnouncementError> for ApiError {
    fn from(err: AnnouncementError) -> Self {
        match err {
            AnnouncementError::NotFound => Self::NotFound("Announcement not found".to_string()),
            AnnouncementError::Validation(msg) => Self::ValidationError(msg),
            AnnouncementError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

#[derive(Deserialize)]
pub struct AnnouncementRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub pinned: bool,
}

/// Pinned posts first, then newest.
pub async fn list_announcements(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AnnouncementDto>>>, ApiError> {
    let announcements = state.store().list_announcements().await?;

    Ok(Json(ApiResponse::success(
        announcements.into_iter().map(AnnouncementDto::from).collect(),
    )))
}

pub async fn create_announcement(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Json(payload): Json<AnnouncementRequest>,
) -> Result<Json<ApiResponse<AnnouncementDto>>, ApiError> {
    let announcement = state
        .announcement_service()
        .publish(&payload.title, &payload.body, payload.pinned, principal.id)
        .await?;

    Ok(Json(ApiResponse::success(AnnouncementDto::from(
        announcement,
    ))))
}

pub async fn update_announcement(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<AnnouncementRequest>,
) -> Result<Json<ApiResponse<AnnouncementDto>>, ApiError> {
    validate_record_id(id)?;

    let announcement = state
        .announcement_service()
        .update(id, &payload.title, &payload.body, payload.pinned)
        .await?;

    Ok(Json(ApiResponse::success(AnnouncementDto::from(
        announcement,
    ))))
}

pub async fn delete_announcement(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validate_record_id(id)?;

    state.announcement_service().delete(id).await?;

    Ok(Json(ApiResponse::success(())))
}
