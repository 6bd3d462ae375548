use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_record_id;
use super::{ApiError, ApiResponse, AppState};
use crate::constants::notifications as limits;
use crate::entities::notifications;

#[derive(Deserialize)]
pub struct ListNotificationsQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<u64>,
}

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}

#[derive(Serialize)]
pub struct MarkedResponse {
    pub marked: u64,
}

/// Own notifications, newest first.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<ApiResponse<Vec<notifications::Model>>>, ApiError> {
    let limit = query
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(limits::DEFAULT_LIST_LIMIT)
        .min(limits::MAX_LIST_LIMIT);

    let rows = state
        .store()
        .list_notifications_for_user(principal.id, query.unread_only, limit)
        .await?;

    Ok(Json(ApiResponse::success(rows)))
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validate_record_id(id)?;

    // Scoped to the caller so nobody can mark another user's rows.
    let marked = state
        .store()
        .mark_notification_read(id, principal.id)
        .await?;

    if !marked {
        return Err(ApiError::not_found("Notification", id));
    }

    Ok(Json(ApiResponse::success(())))
}

pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<MarkedResponse>>, ApiError> {
    let marked = state
        .store()
        .mark_all_notifications_read(principal.id)
        .await?;

    Ok(Json(ApiResponse::success(MarkedResponse { marked })))
}

pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UnreadCountResponse>>, ApiError> {
    let count = state
        .store()
        .count_unread_notifications(principal.id)
        .await?;

    Ok(Json(ApiResponse::success(UnreadCountResponse { count })))
}
