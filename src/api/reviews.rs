use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_record_id;
use super::{ApiError, ApiResponse, AppState, ReviewDto};
use crate::db::ReviewDraft;
use crate::services::ReviewError;

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::NotFound => Self::NotFound("Review not found".to_string()),
            ReviewError::Validation(msg) => Self::ValidationError(msg),
            ReviewError::Conflict(msg) => Self::Conflict(msg),
            ReviewError::Forbidden(msg) => Self::Forbidden(msg),
            ReviewError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub employee_id: i32,
    pub period: String,
    pub rating: Option<i32>,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
}

pub async fn list_own(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<ReviewDto>>>, ApiError> {
    let reviews = state
        .store()
        .list_reviews_for_employee(principal.id)
        .await?;

    Ok(Json(ApiResponse::success(
        reviews.into_iter().map(ReviewDto::from).collect(),
    )))
}

pub async fn list_all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ReviewDto>>>, ApiError> {
    let reviews = state.store().list_all_reviews().await?;

    Ok(Json(ApiResponse::success(
        reviews.into_iter().map(ReviewDto::from).collect(),
    )))
}

pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    let review = state
        .review_service()
        .create_draft(draft_from(payload, principal.id))
        .await?;

    Ok(Json(ApiResponse::success(ReviewDto::from(review))))
}

pub async fn update_review(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    validate_record_id(id)?;

    let review = state
        .review_service()
        .update_draft(id, draft_from(payload, principal.id))
        .await?;

    Ok(Json(ApiResponse::success(ReviewDto::from(review))))
}

pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    validate_record_id(id)?;

    let review = state.review_service().submit(id).await?;

    Ok(Json(ApiResponse::success(ReviewDto::from(review))))
}

pub async fn acknowledge_review(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    validate_record_id(id)?;

    let review = state
        .review_service()
        .acknowledge(id, principal.id)
        .await?;

    Ok(Json(ApiResponse::success(ReviewDto::from(review))))
}

fn draft_from(payload: ReviewRequest, reviewer_id: i32) -> ReviewDraft {
    ReviewDraft {
        employee_id: payload.employee_id,
        reviewer_id,
        period: payload.period,
        rating: payload.rating,
        strengths: payload.strengths,
        improvements: payload.improvements,
    }
}
