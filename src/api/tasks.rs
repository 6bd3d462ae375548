use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_record_id;
use super::{ApiError, ApiResponse, AppState, TaskDto};
use crate::db::{NewTask, TaskUpdate};
use crate::domain::permissions::TASKS_EDIT;
use crate::services::TaskError;

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound => Self::NotFound("Task not found".to_string()),
            TaskError::ProjectNotFound => Self::NotFound("Project not found".to_string()),
            TaskError::Validation(msg) => Self::ValidationError(msg),
            TaskError::Conflict(msg) => Self::Conflict(msg),
            TaskError::Forbidden(msg) => Self::Forbidden(msg),
            TaskError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

#[derive(Deserialize)]
pub struct ListTasksQuery {
    pub project_id: Option<i32>,
    pub assignee_id: Option<i32>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub project_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<i32>,
    pub due_date: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub project_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<i32>,
    pub due_date: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<ApiResponse<Vec<TaskDto>>>, ApiError> {
    let tasks = state
        .store()
        .list_tasks(query.project_id, query.assignee_id, query.status.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(
        tasks.into_iter().map(TaskDto::from).collect(),
    )))
}

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<Json<ApiResponse<TaskDto>>, ApiError> {
    let task = state
        .task_service()
        .create_task(NewTask {
            project_id: payload.project_id,
            title: payload.title,
            description: payload.description,
            assignee_id: payload.assignee_id,
            due_date: payload.due_date,
            created_by: principal.id,
        })
        .await?;

    Ok(Json(ApiResponse::success(TaskDto::from(task))))
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<ApiResponse<TaskDto>>, ApiError> {
    validate_record_id(id)?;

    let task = state
        .task_service()
        .update_task(
            id,
            TaskUpdate {
                project_id: payload.project_id,
                title: payload.title,
                description: payload.description,
                assignee_id: payload.assignee_id,
                due_date: payload.due_date,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(TaskDto::from(task))))
}

/// Status moves are open to the assignee; anyone else needs the edit
/// permission, which the service checks.
pub async fn set_status(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<StatusRequest>,
) -> Result<Json<ApiResponse<TaskDto>>, ApiError> {
    validate_record_id(id)?;

    let task = state
        .task_service()
        .transition(id, &payload.status, principal.id, principal.has(TASKS_EDIT))
        .await?;

    Ok(Json(ApiResponse::success(TaskDto::from(task))))
}
