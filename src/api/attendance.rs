use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState, AttendanceDto};
use crate::services::AttendanceError;

impl From<AttendanceError> for ApiError {
    fn from(err: AttendanceError) -> Self {
        match err {
            AttendanceError::Validation(msg) => Self::ValidationError(msg),
            AttendanceError::Conflict(msg) => Self::Conflict(msg),
            AttendanceError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

#[derive(Deserialize)]
pub struct ClockInRequest {
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct OwnAttendanceQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn clock_in(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Json(payload): Json<ClockInRequest>,
) -> Result<Json<ApiResponse<AttendanceDto>>, ApiError> {
    let record = state
        .attendance_service()
        .clock_in(principal.id, payload.note)
        .await?;

    Ok(Json(ApiResponse::success(AttendanceDto::from(record))))
}

pub async fn clock_out(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<AttendanceDto>>, ApiError> {
    let record = state.attendance_service().clock_out(principal.id).await?;

    Ok(Json(ApiResponse::success(AttendanceDto::from(record))))
}

pub async fn list_own(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Query(query): Query<OwnAttendanceQuery>,
) -> Result<Json<ApiResponse<Vec<AttendanceDto>>>, ApiError> {
    if let Some(from) = query.from.as_deref() {
        validate_date(from)?;
    }
    if let Some(to) = query.to.as_deref() {
        validate_date(to)?;
    }

    let records = state
        .store()
        .list_attendance_for_user(principal.id, query.from.as_deref(), query.to.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(
        records.into_iter().map(AttendanceDto::from).collect(),
    )))
}

/// Everyone's records for one day, for the team board.
pub async fn list_day(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<ApiResponse<Vec<AttendanceDto>>>, ApiError> {
    validate_date(&date)?;

    let records = state.store().list_attendance_for_day(&date).await?;

    Ok(Json(ApiResponse::success(
        records.into_iter().map(AttendanceDto::from).collect(),
    )))
}

fn validate_date(value: &str) -> Result<(), ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ApiError::validation(format!("'{value}' is not a YYYY-MM-DD date")))
}
