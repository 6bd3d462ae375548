//! Domain events for the application.
//!
//! These events are sent via the event bus to notify clients of workflow
//! state changes. The audit listener persists every one of them; SSE
//! subscribers receive them live.

use serde::Serialize;

/// Events fanned out on the broadcast bus.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum NotificationEvent {
    LeaveSubmitted {
        leave_id: i32,
        user_id: i32,
        user_name: String,
        kind: String,
        business_days: i32,
    },
    LeaveDecided {
        leave_id: i32,
        user_id: i32,
        approved: bool,
        decided_by: String,
    },
    LeaveCancelled {
        leave_id: i32,
        user_id: i32,
    },

    ExpenseSubmitted {
        expense_id: i32,
        user_id: i32,
        user_name: String,
        amount_cents: i64,
        currency: String,
    },
    ExpenseDecided {
        expense_id: i32,
        user_id: i32,
        approved: bool,
        decided_by: String,
    },

    AnnouncementPublished {
        announcement_id: i32,
        title: String,
    },

    TaskAssigned {
        task_id: i32,
        title: String,
        assignee_id: i32,
    },
    TaskCompleted {
        task_id: i32,
        title: String,
    },

    ReviewSubmitted {
        review_id: i32,
        employee_id: i32,
        period: String,
    },
    ReviewAcknowledged {
        review_id: i32,
        employee_id: i32,
    },

    EmployeeCreated {
        user_id: i32,
        username: String,
    },
    EmployeeDeactivated {
        user_id: i32,
        username: String,
    },
    RoleAssigned {
        user_id: i32,
        role_name: Option<String>,
    },
    RoleMutated {
        role_id: i32,
        name: String,
        action: String,
    },

    ReminderRun {
        job: String,
        notified: i32,
    },

    Error {
        message: String,
    },
    Info {
        message: String,
    },
}
