//! System endpoints: status, configuration, health probes, and the
//! audit trail.

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{normalize_page, normalize_page_size};
use super::{ApiError, ApiResponse, AppState};
use crate::config::Config;
use crate::db::AuditLog;
use crate::domain::permissions::SYSTEM_ADMIN;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub database: &'static str,
    pub company: String,
}

#[derive(Debug, Serialize)]
pub struct HealthLiveResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthReadyResponse {
    pub ready: bool,
    pub database: bool,
}

#[derive(Deserialize)]
pub struct AuditQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub level: Option<String>,
    pub event_type: Option<String>,
}

#[derive(Serialize)]
pub struct AuditPage {
    pub entries: Vec<AuditLog>,
    pub total_pages: u64,
    pub page: u64,
    pub page_size: u64,
}

/// `GET /api/system/status`
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let database = if state.store().ping().await.is_ok() {
        "connected"
    } else {
        "error"
    };

    let company = {
        let config = state.config().read().await;
        config.company.name.clone()
    };

    Ok(Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        database,
        company,
    })))
}

/// `GET /api/system/config`
pub async fn get_config(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Config>>, ApiError> {
    let config = state.config().read().await.clone();
    Ok(Json(ApiResponse::success(config)))
}

/// `PUT /api/system/config`
///
/// Validates, persists to disk, then swaps the in-memory copy so running
/// services pick the new values up on their next read.
pub async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(new_config): Json<Config>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    new_config
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    new_config
        .save()
        .map_err(|e| ApiError::internal(format!("Failed to save config: {e}")))?;

    *state.config().write().await = new_config;

    tracing::info!("Configuration updated");

    Ok(Json(ApiResponse::success(())))
}

/// `GET /api/system/health/live`
pub async fn health_live() -> impl IntoResponse {
    Json(ApiResponse::success(HealthLiveResponse { status: "alive" }))
}

/// `GET /api/system/health/ready`
pub async fn health_ready(State(state): State<Arc<AppState>>) -> Response {
    let database = state.store().ping().await.is_ok();

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse::success(HealthReadyResponse {
            ready: database,
            database,
        })),
    )
        .into_response()
}

/// `GET /api/system/audit`
pub async fn get_audit(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<ApiResponse<AuditPage>>, ApiError> {
    let page = normalize_page(query.page);
    let page_size = normalize_page_size(query.page_size);

    let (entries, total_pages) = state
        .store()
        .get_audit_entries(page, page_size, query.level, query.event_type)
        .await?;

    Ok(Json(ApiResponse::success(AuditPage {
        entries,
        total_pages,
        page,
        page_size,
    })))
}

/// `DELETE /api/system/audit`
///
/// Destructive, so the handler demands the literal wildcard instead of a
/// route guard.
pub async fn clear_audit(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !principal.has(SYSTEM_ADMIN) {
        return Err(ApiError::forbidden(&[SYSTEM_ADMIN]));
    }

    state.store().clear_audit_entries().await?;

    tracing::warn!(user_id = principal.id, "Audit log cleared");

    Ok(Json(ApiResponse::success(())))
}
