use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_record_id;
use super::{ApiError, ApiResponse, AppState, ExpenseDto};
use crate::services::ExpenseError;

impl From<ExpenseError> for ApiError {
    fn from(err: ExpenseError) -> Self {
        match err {
            ExpenseError::NotFound => Self::NotFound("Expense report not found".to_string()),
            ExpenseError::Validation(msg) => Self::ValidationError(msg),
            ExpenseError::Conflict(msg) => Self::Conflict(msg),
            ExpenseError::Forbidden(msg) => Self::Forbidden(msg),
            ExpenseError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

#[derive(Deserialize)]
pub struct SubmitExpenseRequest {
    pub description: String,
    pub amount_cents: i64,
    pub currency: Option<String>,
    pub expense_date: String,
}

#[derive(Deserialize)]
pub struct TeamExpensesQuery {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct DecisionRequest {
    pub note: Option<String>,
}

pub async fn list_own(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<ExpenseDto>>>, ApiError> {
    let expenses = state
        .store()
        .list_expense_reports_for_user(principal.id)
        .await?;

    Ok(Json(ApiResponse::success(
        expenses.into_iter().map(ExpenseDto::from).collect(),
    )))
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Json(payload): Json<SubmitExpenseRequest>,
) -> Result<Json<ApiResponse<ExpenseDto>>, ApiError> {
    let default_currency = {
        let config = state.config().read().await;
        config.company.default_currency.clone()
    };

    let expense = state
        .expense_service()
        .submit(
            principal.id,
            &principal.display_name,
            &payload.description,
            payload.amount_cents,
            payload.currency,
            &payload.expense_date,
            &default_currency,
        )
        .await?;

    Ok(Json(ApiResponse::success(ExpenseDto::from(expense))))
}

pub async fn delete_own(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validate_record_id(id)?;

    state.expense_service().delete_own(id, principal.id).await?;

    Ok(Json(ApiResponse::success(())))
}

pub async fn list_all(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TeamExpensesQuery>,
) -> Result<Json<ApiResponse<Vec<ExpenseDto>>>, ApiError> {
    let expenses = state
        .store()
        .list_all_expense_reports(query.status.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(
        expenses.into_iter().map(ExpenseDto::from).collect(),
    )))
}

pub async fn approve(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<DecisionRequest>,
) -> Result<Json<ApiResponse<ExpenseDto>>, ApiError> {
    decide(&state, &principal, id, true, payload.note).await
}

pub async fn reject(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<DecisionRequest>,
) -> Result<Json<ApiResponse<ExpenseDto>>, ApiError> {
    decide(&state, &principal, id, false, payload.note).await
}

async fn decide(
    state: &AppState,
    principal: &CurrentUser,
    id: i32,
    approve: bool,
    note: Option<String>,
) -> Result<Json<ApiResponse<ExpenseDto>>, ApiError> {
    validate_record_id(id)?;

    let expense = state
        .expense_service()
        .decide(id, approve, note, principal.id, &principal.display_name)
        .await?;

    Ok(Json(ApiResponse::success(ExpenseDto::from(expense))))
}
