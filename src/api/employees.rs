use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::task;

use super::auth::CurrentUser;
use super::validation::{validate_employee_id, validate_username};
use super::{ApiError, ApiResponse, AppState, EmployeeDto};
use crate::db::{NewUser, UserProfileUpdate};
use crate::db::repositories::user::hash_password;
use crate::domain::LegacyRole;
use crate::domain::events::NotificationEvent;

#[derive(Deserialize)]
pub struct ListEmployeesQuery {
    pub department: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Deserialize)]
pub struct CreateEmployeeRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub hire_date: Option<String>,
    pub manager_id: Option<i32>,
    pub legacy_role: Option<String>,
    pub role_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateEmployeeRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub hire_date: Option<String>,
    pub manager_id: Option<i32>,
    pub legacy_role: Option<String>,
}

#[derive(Deserialize)]
pub struct SetRoleRequest {
    pub role_id: Option<i32>,
}

pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<Json<ApiResponse<Vec<EmployeeDto>>>, ApiError> {
    let users = state
        .store()
        .list_users(query.department.as_deref(), query.include_inactive)
        .await?;

    Ok(Json(ApiResponse::success(
        users.into_iter().map(EmployeeDto::from).collect(),
    )))
}

pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EmployeeDto>>, ApiError> {
    validate_employee_id(id)?;

    let user = state
        .store()
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee", id))?;

    Ok(Json(ApiResponse::success(EmployeeDto::from(user))))
}

pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> Result<Json<ApiResponse<EmployeeDto>>, ApiError> {
    let username = validate_username(&payload.username)?.to_string();
    validate_profile_fields(&payload.email, &payload.first_name, &payload.last_name)?;
    validate_legacy_role(payload.legacy_role.as_deref())?;

    let security = {
        let config = state.config().read().await;
        config.security.clone()
    };

    if payload.password.len() < security.min_password_length {
        return Err(ApiError::validation(format!(
            "Password must be at least {} characters",
            security.min_password_length
        )));
    }

    if state.store().get_user_by_username(&username).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "Username '{username}' is already taken"
        )));
    }
    if state.store().get_user_by_email(&payload.email).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "E-mail '{}' is already in use",
            payload.email
        )));
    }

    if let Some(role_id) = payload.role_id
        && state.store().get_role(role_id).await?.is_none()
    {
        return Err(ApiError::not_found("Role", role_id));
    }

    if let Some(manager_id) = payload.manager_id
        && state.store().get_user_by_id(manager_id).await?.is_none()
    {
        return Err(ApiError::not_found("Manager", manager_id));
    }

    // Argon2 is CPU heavy, keep it off the async workers.
    let password = payload.password.clone();
    let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
        .await
        .map_err(|e| ApiError::internal(format!("Hashing task panicked: {e}")))??;

    let user = state
        .store()
        .create_user(NewUser {
            username,
            email: payload.email,
            password_hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
            department: payload.department,
            job_title: payload.job_title,
            hire_date: payload.hire_date,
            manager_id: payload.manager_id,
            legacy_role: payload.legacy_role,
            role_id: payload.role_id,
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Employee created");

    let _ = state.event_bus().send(NotificationEvent::EmployeeCreated {
        user_id: user.id,
        username: user.username.clone(),
    });

    Ok(Json(ApiResponse::success(EmployeeDto::from(user))))
}

pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> Result<Json<ApiResponse<EmployeeDto>>, ApiError> {
    validate_employee_id(id)?;
    validate_profile_fields(&payload.email, &payload.first_name, &payload.last_name)?;
    validate_legacy_role(payload.legacy_role.as_deref())?;

    if let Some(other) = state.store().get_user_by_email(&payload.email).await?
        && other.id != id
    {
        return Err(ApiError::Conflict(format!(
            "E-mail '{}' is already in use",
            payload.email
        )));
    }

    if let Some(manager_id) = payload.manager_id {
        if manager_id == id {
            return Err(ApiError::validation("An employee cannot manage themselves"));
        }
        if state.store().get_user_by_id(manager_id).await?.is_none() {
            return Err(ApiError::not_found("Manager", manager_id));
        }
    }

    let user = state
        .store()
        .update_user_profile(
            id,
            UserProfileUpdate {
                email: payload.email,
                first_name: payload.first_name,
                last_name: payload.last_name,
                department: payload.department,
                job_title: payload.job_title,
                hire_date: payload.hire_date,
                manager_id: payload.manager_id,
                legacy_role: payload.legacy_role,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Employee", id))?;

    Ok(Json(ApiResponse::success(EmployeeDto::from(user))))
}

pub async fn deactivate_employee(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EmployeeDto>>, ApiError> {
    validate_employee_id(id)?;

    if id == principal.id {
        return Err(ApiError::validation("You cannot deactivate your own account"));
    }

    let user = state
        .store()
        .set_user_active(id, false)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee", id))?;

    tracing::info!(user_id = id, "Employee deactivated");

    let _ = state
        .event_bus()
        .send(NotificationEvent::EmployeeDeactivated {
            user_id: user.id,
            username: user.username.clone(),
        });

    Ok(Json(ApiResponse::success(EmployeeDto::from(user))))
}

pub async fn activate_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EmployeeDto>>, ApiError> {
    validate_employee_id(id)?;

    let user = state
        .store()
        .set_user_active(id, true)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee", id))?;

    tracing::info!(user_id = id, "Employee reactivated");

    Ok(Json(ApiResponse::success(EmployeeDto::from(user))))
}

pub async fn set_employee_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<SetRoleRequest>,
) -> Result<Json<ApiResponse<EmployeeDto>>, ApiError> {
    validate_employee_id(id)?;

    state.role_service().assign_role(id, payload.role_id).await?;

    let user = state
        .store()
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee", id))?;

    Ok(Json(ApiResponse::success(EmployeeDto::from(user))))
}

fn validate_profile_fields(
    email: &str,
    first_name: &str,
    last_name: &str,
) -> Result<(), ApiError> {
    if !email.contains('@') {
        return Err(ApiError::validation(format!("'{email}' is not an e-mail address")));
    }
    if first_name.trim().is_empty() || last_name.trim().is_empty() {
        return Err(ApiError::validation("First and last name are required"));
    }
    Ok(())
}

fn validate_legacy_role(legacy_role: Option<&str>) -> Result<(), ApiError> {
    if let Some(raw) = legacy_role
        && LegacyRole::parse(raw).is_none()
    {
        return Err(ApiError::validation(format!("Unknown legacy role '{raw}'")));
    }
    Ok(())
}
