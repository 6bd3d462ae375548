use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_record_id;
use super::{ApiError, ApiResponse, AppState, LeaveRequestDto};
use crate::domain::permissions::SYSTEM_ADMIN;
use crate::services::LeaveError;

impl From<LeaveError> for ApiError {
    fn from(err: LeaveError) -> Self {
        match err {
            LeaveError::NotFound => Self::NotFound("Leave request not found".to_string()),
            LeaveError::Validation(msg) => Self::ValidationError(msg),
            LeaveError::Conflict(msg) => Self::Conflict(msg),
            LeaveError::Forbidden(msg) => Self::Forbidden(msg),
            LeaveError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

#[derive(Deserialize)]
pub struct SubmitLeaveRequest {
    pub kind: String,
    pub start_date: String,
    pub end_date: String,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct TeamLeavesQuery {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct DecisionRequest {
    pub note: Option<String>,
}

pub async fn list_own(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<LeaveRequestDto>>>, ApiError> {
    let leaves = state
        .store()
        .list_leave_requests_for_user(principal.id)
        .await?;

    Ok(Json(ApiResponse::success(
        leaves.into_iter().map(LeaveRequestDto::from).collect(),
    )))
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Json(payload): Json<SubmitLeaveRequest>,
) -> Result<Json<ApiResponse<LeaveRequestDto>>, ApiError> {
    let leave = state
        .leave_service()
        .submit(
            principal.id,
            &principal.display_name,
            &payload.kind,
            &payload.start_date,
            &payload.end_date,
            payload.reason,
        )
        .await?;

    Ok(Json(ApiResponse::success(LeaveRequestDto::from(leave))))
}

pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<LeaveRequestDto>>, ApiError> {
    validate_record_id(id)?;

    let leave = state.leave_service().cancel(id, principal.id).await?;

    Ok(Json(ApiResponse::success(LeaveRequestDto::from(leave))))
}

pub async fn list_all(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TeamLeavesQuery>,
) -> Result<Json<ApiResponse<Vec<LeaveRequestDto>>>, ApiError> {
    let leaves = state
        .store()
        .list_all_leave_requests(query.status.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(
        leaves.into_iter().map(LeaveRequestDto::from).collect(),
    )))
}

pub async fn approve(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<DecisionRequest>,
) -> Result<Json<ApiResponse<LeaveRequestDto>>, ApiError> {
    decide(&state, &principal, id, true, payload.note).await
}

pub async fn reject(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<DecisionRequest>,
) -> Result<Json<ApiResponse<LeaveRequestDto>>, ApiError> {
    decide(&state, &principal, id, false, payload.note).await
}

async fn decide(
    state: &AppState,
    principal: &CurrentUser,
    id: i32,
    approve: bool,
    note: Option<String>,
) -> Result<Json<ApiResponse<LeaveRequestDto>>, ApiError> {
    validate_record_id(id)?;

    let leave = state
        .leave_service()
        .decide(
            id,
            approve,
            note,
            principal.id,
            &principal.display_name,
            principal.has(SYSTEM_ADMIN),
        )
        .await?;

    Ok(Json(ApiResponse::success(LeaveRequestDto::from(leave))))
}
