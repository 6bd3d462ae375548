//! Domain service for the leave request workflow.

use chrono::{Datelike, NaiveDate, Utc, Weekday};
use thiserror::Error;
use tracing::info;

use crate::db::Store;
use crate::domain::events::NotificationEvent;
use crate::domain::permissions::LEAVES_APPROVE;
use crate::domain::{LeaveKind, LeaveStatus};
use crate::entities::leave_requests;
use crate::services::Notifier;

/// Errors specific to leave operations.
#[derive(Debug, Error)]
pub enum LeaveError {
    #[error("Leave request not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for LeaveError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Clone)]
pub struct LeaveService {
    store: Store,
    notifier: Notifier,
}

impl LeaveService {
    #[must_use]
    pub const fn new(store: Store, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    /// Submits a leave request for the caller.
    ///
    /// The span is inclusive; weekends never count. A weekend-only span is
    /// rejected, as is any overlap with the caller's open requests.
    pub async fn submit(
        &self,
        user_id: i32,
        user_name: &str,
        kind: &str,
        start_date: &str,
        end_date: &str,
        reason: Option<String>,
    ) -> Result<leave_requests::Model, LeaveError> {
        let kind = LeaveKind::parse(kind)
            .ok_or_else(|| LeaveError::Validation(format!("Unknown leave kind '{kind}'")))?;

        let start = parse_date(start_date)?;
        let end = parse_date(end_date)?;

        if start > end {
            return Err(LeaveError::Validation(
                "Start date must not be after end date".to_string(),
            ));
        }

        let business_days = business_days_between(start, end);
        if business_days == 0 {
            return Err(LeaveError::Validation(
                "The requested span contains no business days".to_string(),
            ));
        }

        let overlapping = self
            .store
            .overlapping_leave_requests(user_id, start_date, end_date)
            .await?;
        if !overlapping.is_empty() {
            return Err(LeaveError::Conflict(
                "The requested span overlaps an existing leave request".to_string(),
            ));
        }

        let leave = self
            .store
            .create_leave_request(
                user_id,
                kind.as_str(),
                start_date,
                end_date,
                business_days,
                reason,
            )
            .await?;

        info!(leave_id = leave.id, user_id, business_days, "Leave request submitted");

        self.notifier
            .notify_holders(
                LEAVES_APPROVE,
                "leave_request",
                &format!(
                    "{user_name} requested {business_days} business day(s) of {} leave",
                    kind.as_str()
                ),
                Some("leave_request"),
                Some(leave.id),
            )
            .await?;

        self.notifier.broadcast(NotificationEvent::LeaveSubmitted {
            leave_id: leave.id,
            user_id,
            user_name: user_name.to_string(),
            kind: kind.as_str().to_string(),
            business_days,
        });

        Ok(leave)
    }

    /// Approves or rejects a pending request.
    ///
    /// Deciding your own request requires the `system.admin` wildcard, which
    /// the caller resolves and passes as `decider_has_wildcard`.
    pub async fn decide(
        &self,
        id: i32,
        approve: bool,
        note: Option<String>,
        decided_by: i32,
        decided_by_name: &str,
        decider_has_wildcard: bool,
    ) -> Result<leave_requests::Model, LeaveError> {
        let leave = self.store.get_leave_request(id).await?.ok_or(LeaveError::NotFound)?;

        if leave.status != LeaveStatus::Pending.as_str() {
            return Err(LeaveError::Conflict(
                "Only pending requests can be decided".to_string(),
            ));
        }

        if leave.user_id == decided_by && !decider_has_wildcard {
            return Err(LeaveError::Forbidden(
                "Deciding your own leave request requires system.admin".to_string(),
            ));
        }

        let status = if approve {
            LeaveStatus::Approved
        } else {
            LeaveStatus::Rejected
        };

        let leave = self
            .store
            .decide_leave_request(id, status, decided_by, note)
            .await?
            .ok_or(LeaveError::NotFound)?;

        info!(leave_id = id, approve, decided_by, "Leave request decided");

        let verdict = if approve { "approved" } else { "rejected" };
        self.notifier
            .notify_user(
                leave.user_id,
                "leave_decision",
                &format!(
                    "Your leave request ({} to {}) was {verdict} by {decided_by_name}",
                    leave.start_date, leave.end_date
                ),
                Some("leave_request"),
                Some(leave.id),
            )
            .await?;

        self.notifier.broadcast(NotificationEvent::LeaveDecided {
            leave_id: leave.id,
            user_id: leave.user_id,
            approved: approve,
            decided_by: decided_by_name.to_string(),
        });

        Ok(leave)
    }

    /// Cancels the caller's own pending request.
    pub async fn cancel(&self, id: i32, user_id: i32) -> Result<leave_requests::Model, LeaveError> {
        let leave = self.store.get_leave_request(id).await?.ok_or(LeaveError::NotFound)?;

        if leave.user_id != user_id {
            return Err(LeaveError::Forbidden(
                "Only the requester can cancel a leave request".to_string(),
            ));
        }

        if leave.status != LeaveStatus::Pending.as_str() {
            return Err(LeaveError::Conflict(
                "Only pending requests can be cancelled".to_string(),
            ));
        }

        let leave = self
            .store
            .set_leave_request_status(id, LeaveStatus::Cancelled)
            .await?
            .ok_or(LeaveError::NotFound)?;

        info!(leave_id = id, user_id, "Leave request cancelled");

        self.notifier.broadcast(NotificationEvent::LeaveCancelled {
            leave_id: leave.id,
            user_id,
        });

        Ok(leave)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, LeaveError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| LeaveError::Validation(format!("'{value}' is not a YYYY-MM-DD date")))
}

/// Inclusive business-day count; Saturdays and Sundays are skipped.
#[must_use]
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let mut days = 0;
    let mut cursor = start;
    while cursor <= end {
        if !matches!(cursor.weekday(), Weekday::Sat | Weekday::Sun) {
            days += 1;
        }
        let Some(next) = cursor.succ_opt() else { break };
        cursor = next;
    }
    days
}

/// Today in the date format used throughout the schema.
#[must_use]
pub fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn counts_single_weekday() {
        // 2026-08-25 is a Tuesday
        assert_eq!(business_days_between(date("2026-08-25"), date("2026-08-25")), 1);
    }

    #[test]
    fn counts_full_week_as_five() {
        // Monday through Sunday
        assert_eq!(business_days_between(date("2026-08-24"), date("2026-08-30")), 5);
    }

    #[test]
    fn weekend_only_span_is_zero() {
        // Saturday and Sunday
        assert_eq!(business_days_between(date("2026-08-29"), date("2026-08-30")), 0);
    }

    #[test]
    fn spans_crossing_weekends() {
        // Friday through Monday: Fri + Mon
        assert_eq!(business_days_between(date("2026-08-28"), date("2026-08-31")), 2);

        // Two full weeks
        assert_eq!(business_days_between(date("2026-08-24"), date("2026-09-06")), 10);
    }
}
