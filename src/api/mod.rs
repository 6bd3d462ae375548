use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use time;

use crate::config::Config;
use crate::state::SharedState;

mod announcements;
mod attendance;
pub mod auth;
mod dashboard;
mod employees;
mod error;
pub mod events;
mod expenses;
mod guard;
mod leaves;
mod notifications;
mod observability;
mod projects;
mod reviews;
mod roles;
mod system;
mod tasks;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

pub use crate::domain::events::NotificationEvent;

use crate::domain::permissions::{
    ANNOUNCEMENTS_MANAGE, ANNOUNCEMENTS_VIEW, ATTENDANCE_RECORD, ATTENDANCE_VIEW,
    ATTENDANCE_VIEW_TEAM, AUDIT_VIEW, EXPENSES_APPROVE, EXPENSES_CREATE, EXPENSES_VIEW,
    EXPENSES_VIEW_TEAM, LEAVES_APPROVE, LEAVES_CREATE, LEAVES_VIEW, LEAVES_VIEW_TEAM,
    PROJECTS_MANAGE, PROJECTS_VIEW, REVIEWS_MANAGE, REVIEWS_VIEW, REVIEWS_VIEW_TEAM, ROLES_MANAGE,
    ROLES_VIEW, SETTINGS_MANAGE, TASKS_CREATE, TASKS_EDIT, TASKS_VIEW, USERS_ASSIGN_ROLE,
    USERS_CREATE, USERS_DEACTIVATE, USERS_EDIT, USERS_VIEW,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn event_bus(&self) -> &tokio::sync::broadcast::Sender<NotificationEvent> {
        &self.shared.event_bus
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn crate::services::AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn role_service(&self) -> &Arc<dyn crate::services::RoleService> {
        &self.shared.role_service
    }

    #[must_use]
    pub fn leave_service(&self) -> &crate::services::LeaveService {
        &self.shared.leave_service
    }

    #[must_use]
    pub fn attendance_service(&self) -> &crate::services::AttendanceService {
        &self.shared.attendance_service
    }

    #[must_use]
    pub fn expense_service(&self) -> &crate::services::ExpenseService {
        &self.shared.expense_service
    }

    #[must_use]
    pub fn announcement_service(&self) -> &crate::services::AnnouncementService {
        &self.shared.announcement_service
    }

    #[must_use]
    pub fn task_service(&self) -> &crate::services::TaskService {
        &self.shared.task_service
    }

    #[must_use]
    pub fn review_service(&self) -> &crate::services::ReviewService {
        &self.shared.review_service
    }
}

pub async fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    Ok(Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    create_app_state(shared, prometheus_handle).await
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, secure_cookies, inactivity_minutes) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_inactivity_minutes,
        )
    };

    let protected_routes = create_protected_router(state.clone());

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            inactivity_minutes,
        )));

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/system/health/live", get(system::health_live))
        .route("/system/health/ready", get(system::health_ready))
        .layer(session_layer)
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .route(
            "/metrics",
            get(observability::get_metrics).with_state(state),
        )
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
}

/// Everything behind the auth wall. Route groups declare their permission
/// guards here, at the call site.
fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let require = |names: &'static [&'static str]| {
        middleware::from_fn_with_state(state.clone(), guard::require(names))
    };

    Router::new()
        // Account endpoints need a principal but no specific permission.
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/permissions", get(auth::get_permissions))
        .route("/auth/change-password", post(auth::change_password))
        .route("/auth/api-key", get(auth::get_api_key))
        .route("/auth/api-key", post(auth::regenerate_api_key))
        .merge(
            Router::new()
                .route("/employees", get(employees::list_employees))
                .route("/employees/{id}", get(employees::get_employee))
                .route_layer(require(&[USERS_VIEW])),
        )
        .merge(
            Router::new()
                .route("/employees", post(employees::create_employee))
                .route_layer(require(&[USERS_CREATE])),
        )
        .merge(
            Router::new()
                .route("/employees/{id}", put(employees::update_employee))
                .route_layer(require(&[USERS_EDIT])),
        )
        .merge(
            Router::new()
                .route(
                    "/employees/{id}/deactivate",
                    post(employees::deactivate_employee),
                )
                .route("/employees/{id}/activate", post(employees::activate_employee))
                .route_layer(require(&[USERS_DEACTIVATE])),
        )
        .merge(
            Router::new()
                .route("/employees/{id}/role", put(employees::set_employee_role))
                .route_layer(require(&[USERS_ASSIGN_ROLE])),
        )
        .merge(
            Router::new()
                .route("/roles", get(roles::list_roles))
                .route("/roles/catalog", get(roles::get_catalog))
                .route("/roles/{id}", get(roles::get_role))
                .route_layer(require(&[ROLES_VIEW])),
        )
        .merge(
            Router::new()
                .route("/roles", post(roles::create_role))
                .route("/roles/{id}", put(roles::update_role))
                .route("/roles/{id}", delete(roles::delete_role))
                .route_layer(require(&[ROLES_MANAGE])),
        )
        .merge(
            Router::new()
                .route("/leaves", get(leaves::list_own))
                .route_layer(require(&[LEAVES_VIEW])),
        )
        .merge(
            Router::new()
                .route("/leaves", post(leaves::submit))
                .route("/leaves/{id}/cancel", post(leaves::cancel))
                .route_layer(require(&[LEAVES_CREATE])),
        )
        .merge(
            Router::new()
                .route("/leaves/all", get(leaves::list_all))
                .route_layer(require(&[LEAVES_VIEW_TEAM])),
        )
        .merge(
            Router::new()
                .route("/leaves/{id}/approve", post(leaves::approve))
                .route("/leaves/{id}/reject", post(leaves::reject))
                .route_layer(require(&[LEAVES_APPROVE])),
        )
        .merge(
            Router::new()
                .route("/attendance/clock-in", post(attendance::clock_in))
                .route("/attendance/clock-out", post(attendance::clock_out))
                .route_layer(require(&[ATTENDANCE_RECORD])),
        )
        .merge(
            Router::new()
                .route("/attendance", get(attendance::list_own))
                .route_layer(require(&[ATTENDANCE_VIEW])),
        )
        .merge(
            Router::new()
                .route("/attendance/day/{date}", get(attendance::list_day))
                .route_layer(require(&[ATTENDANCE_VIEW_TEAM])),
        )
        .merge(
            Router::new()
                .route("/expenses", get(expenses::list_own))
                .route_layer(require(&[EXPENSES_VIEW])),
        )
        .merge(
            Router::new()
                .route("/expenses", post(expenses::submit))
                .route("/expenses/{id}", delete(expenses::delete_own))
                .route_layer(require(&[EXPENSES_CREATE])),
        )
        .merge(
            Router::new()
                .route("/expenses/all", get(expenses::list_all))
                .route_layer(require(&[EXPENSES_VIEW_TEAM])),
        )
        .merge(
            Router::new()
                .route("/expenses/{id}/approve", post(expenses::approve))
                .route("/expenses/{id}/reject", post(expenses::reject))
                .route_layer(require(&[EXPENSES_APPROVE])),
        )
        .merge(
            Router::new()
                .route("/announcements", get(announcements::list_announcements))
                .route_layer(require(&[ANNOUNCEMENTS_VIEW])),
        )
        .merge(
            Router::new()
                .route("/announcements", post(announcements::create_announcement))
                .route("/announcements/{id}", put(announcements::update_announcement))
                .route(
                    "/announcements/{id}",
                    delete(announcements::delete_announcement),
                )
                .route_layer(require(&[ANNOUNCEMENTS_MANAGE])),
        )
        .merge(
            Router::new()
                .route("/projects", get(projects::list_projects))
                .route_layer(require(&[PROJECTS_VIEW])),
        )
        .merge(
            Router::new()
                .route("/projects", post(projects::create_project))
                .route("/projects/{id}", put(projects::update_project))
                .route_layer(require(&[PROJECTS_MANAGE])),
        )
        .merge(
            Router::new()
                .route("/tasks", get(tasks::list_tasks))
                .route("/tasks/{id}/status", put(tasks::set_status))
                .route_layer(require(&[TASKS_VIEW])),
        )
        .merge(
            Router::new()
                .route("/tasks", post(tasks::create_task))
                .route_layer(require(&[TASKS_CREATE])),
        )
        .merge(
            Router::new()
                .route("/tasks/{id}", put(tasks::update_task))
                .route_layer(require(&[TASKS_EDIT])),
        )
        .merge(
            Router::new()
                .route("/reviews", get(reviews::list_own))
                .route("/reviews/{id}/acknowledge", post(reviews::acknowledge_review))
                .route_layer(require(&[REVIEWS_VIEW])),
        )
        .merge(
            Router::new()
                .route("/reviews/all", get(reviews::list_all))
                .route_layer(require(&[REVIEWS_VIEW_TEAM])),
        )
        .merge(
            Router::new()
                .route("/reviews", post(reviews::create_review))
                .route("/reviews/{id}", put(reviews::update_review))
                .route("/reviews/{id}/submit", post(reviews::submit_review))
                .route_layer(require(&[REVIEWS_MANAGE])),
        )
        .merge(
            // Declared with an empty list: any authenticated caller.
            Router::new()
                .route("/notifications", get(notifications::list_notifications))
                .route("/notifications/{id}/read", post(notifications::mark_read))
                .route("/notifications/read-all", post(notifications::mark_all_read))
                .route(
                    "/notifications/unread-count",
                    get(notifications::unread_count),
                )
                .route_layer(require(&[])),
        )
        .route("/dashboard", get(dashboard::get_summary))
        .route("/system/status", get(system::get_status))
        .merge(
            Router::new()
                .route("/system/config", get(system::get_config))
                .route("/system/config", put(system::update_config))
                .route_layer(require(&[SETTINGS_MANAGE])),
        )
        .merge(
            Router::new()
                .route("/system/audit", get(system::get_audit))
                .route_layer(require(&[AUDIT_VIEW])),
        )
        .route("/system/audit", delete(system::clear_audit))
        .merge(events::router())
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
