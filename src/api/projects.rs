use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_record_id;
use super::{ApiError, ApiResponse, AppState, ProjectDto};

#[derive(Deserialize)]
pub struct ListProjectsQuery {
    #[serde(default)]
    pub include_archived: bool,
}

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<ApiResponse<Vec<ProjectDto>>>, ApiError> {
    let projects = state.store().list_projects(query.include_archived).await?;

    Ok(Json(ApiResponse::success(
        projects.into_iter().map(ProjectDto::from).collect(),
    )))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<Json<ApiResponse<ProjectDto>>, ApiError> {
    let project = state
        .task_service()
        .create_project(&payload.name, payload.description)
        .await?;

    Ok(Json(ApiResponse::success(ProjectDto::from(project))))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<Json<ApiResponse<ProjectDto>>, ApiError> {
    validate_record_id(id)?;

    let project = state
        .task_service()
        .update_project(id, &payload.name, payload.description, payload.archived)
        .await?;

    Ok(Json(ApiResponse::success(ProjectDto::from(project))))
}
