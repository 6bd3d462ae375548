use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, EmployeeDto};
use crate::db::{Store, User};
use crate::services::AuthError;

// ============================================================================
// Principal
// ============================================================================

/// The authenticated caller, resolved once per request by the auth
/// middleware and carried in request extensions. Handlers and guards read
/// it; nobody re-resolves.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub display_name: String,
    pub permissions: HashSet<String>,
}

impl CurrentUser {
    #[must_use]
    pub fn has(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    #[must_use]
    pub fn has_all(&self, required: &[&str]) -> bool {
        required.iter().all(|p| self.has(p))
    }
}

async fn build_principal(store: &Store, user: User) -> Result<CurrentUser, ApiError> {
    let permissions = store
        .resolve_permission_names(user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to resolve permissions: {e}")))?;

    let display_name = format!("{} {}", user.first_name, user.last_name)
        .trim()
        .to_string();

    Ok(CurrentUser {
        id: user.id,
        username: user.username,
        display_name,
        permissions,
    })
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user_id: i32,
    pub username: String,
    pub api_key: String,
    pub must_change_password: bool,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct ApiKeyResponse {
    pub api_key: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct PermissionsResponse {
    pub permissions: Vec<String>,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::Deactivated => {
                Self::Unauthorized(err.to_string())
            }
            AuthError::UserNotFound => Self::NotFound("User not found".to_string()),
            AuthError::Validation(msg) => Self::ValidationError(msg),
            AuthError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware that checks:
/// 1. Session cookie (from login)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <api_key>` header
///
/// On success the resolved [`CurrentUser`] principal is inserted into the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    // Check session first (fastest path for web clients)
    if let Ok(Some(username)) = session.get::<String>("user").await
        && let Ok(Some(user)) = state.store().get_user_by_username(&username).await
        && user.active
    {
        let principal = build_principal(state.store(), user).await?;
        tracing::Span::current().record("user_id", principal.id);
        request.extensions_mut().insert(principal);
        return Ok(next.run(request).await);
    }

    if let Some(key) = extract_api_key(&headers)
        && let Ok(Some(user)) = state.store().verify_api_key(&key).await
        && user.active
    {
        let principal = build_principal(state.store(), user).await?;
        tracing::Span::current().record("user_id", principal.id);
        request.extensions_mut().insert(principal);
        return Ok(next.run(request).await);
    }

    Err(ApiError::Unauthorized("Unauthorized".to_string()))
}

/// Extract API key from headers
fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    // Check X-Api-Key header
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.to_string());
    }

    // Check Authorization: Bearer header
    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Authenticate with username and password, returns API key on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let result = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;

    if let Err(e) = session.insert("user", &result.username).await {
        return Err(ApiError::internal(format!("Failed to create session: {e}")));
    }

    tracing::info!(user_id = result.user_id, "Login succeeded");

    Ok(Json(ApiResponse::success(LoginResponse {
        user_id: result.user_id,
        username: result.username,
        api_key: result.api_key,
        must_change_password: result.must_change_password,
    })))
}

/// POST /auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// GET /auth/me
/// Get the authenticated caller's profile
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<EmployeeDto>>, ApiError> {
    let user = state
        .store()
        .get_user_by_id(principal.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get user: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

    Ok(Json(ApiResponse::success(EmployeeDto::from(user))))
}

/// GET /auth/permissions
/// The caller's resolved permission names, sorted
pub async fn get_permissions(
    Extension(principal): Extension<CurrentUser>,
) -> Json<ApiResponse<PermissionsResponse>> {
    let mut permissions: Vec<String> = principal.permissions.into_iter().collect();
    permissions.sort();

    Json(ApiResponse::success(PermissionsResponse { permissions }))
}

/// POST /auth/change-password
/// Change password (requires current password verification)
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .auth_service()
        .change_password(
            &principal.username,
            &payload.current_password,
            &payload.new_password,
        )
        .await?;

    tracing::info!(user_id = principal.id, "Password changed");

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password updated successfully".to_string(),
    })))
}

/// GET /auth/api-key
/// Get the current API key
pub async fn get_api_key(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<ApiKeyResponse>>, ApiError> {
    let api_key = state.auth_service().get_api_key(&principal.username).await?;

    Ok(Json(ApiResponse::success(ApiKeyResponse { api_key })))
}

/// POST /auth/api-key
/// Generate a new random API key
pub async fn regenerate_api_key(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<ApiKeyResponse>>, ApiError> {
    let api_key = state
        .auth_service()
        .regenerate_api_key(&principal.username)
        .await?;

    tracing::info!(user_id = principal.id, "API key regenerated");

    Ok(Json(ApiResponse::success(ApiKeyResponse { api_key })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(perms: &[&str]) -> CurrentUser {
        CurrentUser {
            id: 1,
            username: "test".to_string(),
            display_name: "Test User".to_string(),
            permissions: perms.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn has_all_requires_every_name() {
        let p = principal(&["leaves.view", "leaves.create"]);
        assert!(p.has_all(&["leaves.view"]));
        assert!(p.has_all(&["leaves.view", "leaves.create"]));
        assert!(!p.has_all(&["leaves.view", "leaves.approve"]));
    }

    #[test]
    fn wildcard_is_not_implicit() {
        let p = principal(&["system.admin"]);
        assert!(!p.has("leaves.approve"));
        assert!(!p.has_all(&["users.view"]));
    }
}
