use axum::{Extension, Json, extract::State};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{
    ApiError, ApiResponse, AppState, DashboardSummary, LeaveRequestDto, OrgDashboard, OwnDashboard,
};
use crate::domain::permissions::REPORTS_VIEW;
use crate::services::leaves::today;

/// One round-trip for the landing page. The org block is appended only
/// for callers holding the reporting permission; everyone else gets just
/// their own numbers.
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<DashboardSummary>>, ApiError> {
    let store = state.store();
    let today = today();

    let own = OwnDashboard {
        pending_leave_requests: store.count_pending_leave_requests_for_user(principal.id).await?,
        unread_notifications: store.count_unread_notifications(principal.id).await?,
        open_tasks: store.count_open_tasks_for_user(principal.id).await?,
        next_approved_leave: store
            .next_approved_leave_for_user(principal.id, &today)
            .await?
            .map(LeaveRequestDto::from),
    };

    let organization = if principal.has(REPORTS_VIEW) {
        Some(OrgDashboard {
            headcount: store.count_active_users().await?,
            clocked_in_today: store.count_attendance_for_day(&today).await?,
            pending_leave_requests: store.count_pending_leave_requests().await?,
            pending_expense_reports: store.count_pending_expense_reports().await?,
            open_tasks: store.count_open_tasks().await?,
        })
    } else {
        None
    };

    Ok(Json(ApiResponse::success(DashboardSummary {
        own,
        organization,
    })))
}
