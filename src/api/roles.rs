use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_record_id;
use super::{ApiError, ApiResponse, AppState};
use crate::db::RoleInput;
use crate::services::{CatalogGroup, RoleDto, RoleError};

impl From<RoleError> for ApiError {
    fn from(err: RoleError) -> Self {
        match err {
            RoleError::NotFound => Self::NotFound("Role not found".to_string()),
            RoleError::UserNotFound => Self::NotFound("Employee not found".to_string()),
            RoleError::Validation(msg) => Self::ValidationError(msg),
            RoleError::Conflict(msg) => Self::Conflict(msg),
            RoleError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

#[derive(Deserialize)]
pub struct RoleRequest {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl From<RoleRequest> for RoleInput {
    fn from(req: RoleRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            color: req.color,
            icon: req.icon,
            permissions: req.permissions,
        }
    }
}

pub async fn list_roles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<RoleDto>>>, ApiError> {
    let roles = state.role_service().list_roles().await?;
    Ok(Json(ApiResponse::success(roles)))
}

pub async fn get_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<RoleDto>>, ApiError> {
    validate_record_id(id)?;
    let role = state.role_service().get_role(id).await?;
    Ok(Json(ApiResponse::success(role)))
}

/// The grouped permission catalog the role editor renders.
pub async fn get_catalog(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CatalogGroup>>>, ApiError> {
    let groups = state.role_service().catalog().await?;
    Ok(Json(ApiResponse::success(groups)))
}

pub async fn create_role(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RoleRequest>,
) -> Result<Json<ApiResponse<RoleDto>>, ApiError> {
    let role = state.role_service().create_role(payload.into()).await?;
    Ok(Json(ApiResponse::success(role)))
}

pub async fn update_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<RoleRequest>,
) -> Result<Json<ApiResponse<RoleDto>>, ApiError> {
    validate_record_id(id)?;
    let role = state.role_service().update_role(id, payload.into()).await?;
    Ok(Json(ApiResponse::success(role)))
}

pub async fn delete_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validate_record_id(id)?;
    state.role_service().delete_role(id).await?;
    Ok(Json(ApiResponse::success(())))
}
