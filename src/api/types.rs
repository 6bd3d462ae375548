use serde::Serialize;

use crate::db::User;
use crate::entities::{
    announcements, attendance_records, expense_reports, leave_requests, performance_reviews,
    projects, tasks,
};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Employee as reported to clients. The API key never leaves the auth
/// endpoints.
#[derive(Debug, Serialize)]
pub struct EmployeeDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub hire_date: Option<String>,
    pub manager_id: Option<i32>,
    pub legacy_role: Option<String>,
    pub role_id: Option<i32>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for EmployeeDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            department: user.department,
            job_title: user.job_title,
            hire_date: user.hire_date,
            manager_id: user.manager_id,
            legacy_role: user.legacy_role,
            role_id: user.role_id,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeaveRequestDto {
    pub id: i32,
    pub user_id: i32,
    pub kind: String,
    pub start_date: String,
    pub end_date: String,
    pub business_days: i32,
    pub reason: Option<String>,
    pub status: String,
    pub decided_by: Option<i32>,
    pub decided_at: Option<String>,
    pub decision_note: Option<String>,
    pub created_at: String,
}

impl From<leave_requests::Model> for LeaveRequestDto {
    fn from(model: leave_requests::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            kind: model.kind,
            start_date: model.start_date,
            end_date: model.end_date,
            business_days: model.business_days,
            reason: model.reason,
            status: model.status,
            decided_by: model.decided_by,
            decided_at: model.decided_at,
            decision_note: model.decision_note,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AttendanceDto {
    pub id: i32,
    pub user_id: i32,
    pub date: String,
    pub clock_in: String,
    pub clock_out: Option<String>,
    pub worked_minutes: Option<i32>,
    pub note: Option<String>,
}

impl From<attendance_records::Model> for AttendanceDto {
    fn from(model: attendance_records::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            date: model.date,
            clock_in: model.clock_in,
            clock_out: model.clock_out,
            worked_minutes: model.worked_minutes,
            note: model.note,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExpenseDto {
    pub id: i32,
    pub user_id: i32,
    pub description: String,
    pub amount_cents: i64,
    pub currency: String,
    pub expense_date: String,
    pub status: String,
    pub decided_by: Option<i32>,
    pub decided_at: Option<String>,
    pub decision_note: Option<String>,
    pub created_at: String,
}

impl From<expense_reports::Model> for ExpenseDto {
    fn from(model: expense_reports::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            description: model.description,
            amount_cents: model.amount_cents,
            currency: model.currency,
            expense_date: model.expense_date,
            status: model.status,
            decided_by: model.decided_by,
            decided_at: model.decided_at,
            decision_note: model.decision_note,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnnouncementDto {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub pinned: bool,
    pub author_id: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<announcements::Model> for AnnouncementDto {
    fn from(model: announcements::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            body: model.body,
            pinned: model.pinned,
            author_id: model.author_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub archived: bool,
    pub created_at: String,
}

impl From<projects::Model> for ProjectDto {
    fn from(model: projects::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            archived: model.archived,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskDto {
    pub id: i32,
    pub project_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<i32>,
    pub due_date: Option<String>,
    pub status: String,
    pub created_by: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<tasks::Model> for TaskDto {
    fn from(model: tasks::Model) -> Self {
        Self {
            id: model.id,
            project_id: model.project_id,
            title: model.title,
            description: model.description,
            assignee_id: model.assignee_id,
            due_date: model.due_date,
            status: model.status,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewDto {
    pub id: i32,
    pub employee_id: i32,
    pub reviewer_id: i32,
    pub period: String,
    pub rating: Option<i32>,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
    pub status: String,
    pub submitted_at: Option<String>,
    pub acknowledged_at: Option<String>,
    pub created_at: String,
}

impl From<performance_reviews::Model> for ReviewDto {
    fn from(model: performance_reviews::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            reviewer_id: model.reviewer_id,
            period: model.period,
            rating: model.rating,
            strengths: model.strengths,
            improvements: model.improvements,
            status: model.status,
            submitted_at: model.submitted_at,
            acknowledged_at: model.acknowledged_at,
            created_at: model.created_at,
        }
    }
}

/// The block every authenticated caller gets on the dashboard.
#[derive(Debug, Serialize)]
pub struct OwnDashboard {
    pub pending_leave_requests: u64,
    pub unread_notifications: u64,
    pub open_tasks: u64,
    pub next_approved_leave: Option<LeaveRequestDto>,
}

/// Org-wide aggregates, only present when the caller holds the reporting
/// permission.
#[derive(Debug, Serialize)]
pub struct OrgDashboard {
    pub headcount: u64,
    pub clocked_in_today: u64,
    pub pending_leave_requests: u64,
    pub pending_expense_reports: u64,
    pub open_tasks: u64,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub own: OwnDashboard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrgDashboard>,
}
