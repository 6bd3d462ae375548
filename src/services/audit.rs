//! Audit trail listener.
//!
//! Subscribes to the event bus and persists every event as an append-only
//! audit row. Pruning happens in the scheduler, manual clearing through the
//! system API.

use crate::db::Store;
use crate::domain::events::NotificationEvent;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::error;

pub struct AuditService {
    store: Store,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl AuditService {
    #[must_use]
    pub const fn new(store: Store, event_bus: broadcast::Sender<NotificationEvent>) -> Self {
        Self { store, event_bus }
    }

    pub fn start_listener(self: Arc<Self>) {
        let mut rx = self.event_bus.subscribe();
        let service = self;

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if let Err(e) = service.handle_event(event).await {
                            error!(error = %e, "Failed to save audit entry");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        error!(count, "Audit listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        error!("Audit listener event bus closed");
                        break;
                    }
                }
            }
        });
    }

    async fn handle_event(&self, event: NotificationEvent) -> anyhow::Result<()> {
        let details = Some(serde_json::to_string(&event)?);

        let (event_type, level, message) = match &event {
            NotificationEvent::LeaveSubmitted {
                user_name,
                kind,
                business_days,
                ..
            } => (
                "LeaveSubmitted",
                "info",
                format!("{user_name} requested {business_days} day(s) of {kind} leave"),
            ),
            NotificationEvent::LeaveDecided {
                leave_id,
                approved,
                decided_by,
                ..
            } => (
                "LeaveDecided",
                if *approved { "success" } else { "info" },
                format!(
                    "Leave request #{leave_id} {} by {decided_by}",
                    if *approved { "approved" } else { "rejected" }
                ),
            ),
            NotificationEvent::LeaveCancelled { leave_id, .. } => (
                "LeaveCancelled",
                "info",
                format!("Leave request #{leave_id} cancelled"),
            ),
            NotificationEvent::ExpenseSubmitted {
                user_name,
                amount_cents,
                currency,
                ..
            } => (
                "ExpenseSubmitted",
                "info",
                format!(
                    "{user_name} submitted an expense of {}.{:02} {currency}",
                    amount_cents / 100,
                    amount_cents % 100
                ),
            ),
            NotificationEvent::ExpenseDecided {
                expense_id,
                approved,
                decided_by,
                ..
            } => (
                "ExpenseDecided",
                if *approved { "success" } else { "info" },
                format!(
                    "Expense report #{expense_id} {} by {decided_by}",
                    if *approved { "approved" } else { "rejected" }
                ),
            ),
            NotificationEvent::AnnouncementPublished { title, .. } => (
                "AnnouncementPublished",
                "info",
                format!("Announcement published: {title}"),
            ),
            NotificationEvent::TaskAssigned {
                title, assignee_id, ..
            } => (
                "TaskAssigned",
                "info",
                format!("Task '{title}' assigned to user #{assignee_id}"),
            ),
            NotificationEvent::TaskCompleted { title, .. } => (
                "TaskCompleted",
                "success",
                format!("Task '{title}' completed"),
            ),
            NotificationEvent::ReviewSubmitted {
                employee_id, period, ..
            } => (
                "ReviewSubmitted",
                "info",
                format!("{period} review submitted for user #{employee_id}"),
            ),
            NotificationEvent::ReviewAcknowledged { review_id, .. } => (
                "ReviewAcknowledged",
                "info",
                format!("Review #{review_id} acknowledged"),
            ),
            NotificationEvent::EmployeeCreated { username, .. } => (
                "EmployeeCreated",
                "info",
                format!("Employee account created: {username}"),
            ),
            NotificationEvent::EmployeeDeactivated { username, .. } => (
                "EmployeeDeactivated",
                "warn",
                format!("Employee account deactivated: {username}"),
            ),
            NotificationEvent::RoleAssigned { user_id, role_name } => (
                "RoleAssigned",
                "info",
                match role_name {
                    Some(name) => format!("User #{user_id} assigned role '{name}'"),
                    None => format!("User #{user_id} role cleared"),
                },
            ),
            NotificationEvent::RoleMutated { name, action, .. } => (
                "RoleMutated",
                "info",
                format!("Role '{name}' {action}"),
            ),
            NotificationEvent::ReminderRun { job, notified } => (
                "ReminderRun",
                "info",
                format!("Reminder job '{job}' notified {notified} user(s)"),
            ),
            NotificationEvent::Error { message } => ("Error", "error", message.clone()),
            NotificationEvent::Info { message } => ("Info", "info", message.clone()),
        };

        self.store
            .add_audit_entry(event_type, level, &message, details)
            .await?;

        Ok(())
    }
}
