//! Domain types for the HR management core.
//!
//! Strongly-typed enums for the workflow state machines and the legacy
//! role system. Entities persist these as strings; services parse at the
//! boundary so state transitions are checked against real variants
//! instead of raw string comparisons.

pub mod events;
pub mod permissions;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Legacy role enum carried over from the pre-RBAC era.
///
/// Users may carry at most one of these. Each maps to a fixed permission
/// list (see [`permissions::legacy_role_permissions`]) that is unioned
/// with the relational role sources at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegacyRole {
    Employee,
    Manager,
    Rh,
    Admin,
    SuperAdmin,
}

impl LegacyRole {
    /// Parses the stored database representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EMPLOYEE" => Some(Self::Employee),
            "MANAGER" => Some(Self::Manager),
            "RH" => Some(Self::Rh),
            "ADMIN" => Some(Self::Admin),
            "SUPER_ADMIN" => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "EMPLOYEE",
            Self::Manager => "MANAGER",
            Self::Rh => "RH",
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// All known variants, in escalation order.
    pub const ALL: [Self; 5] = [
        Self::Employee,
        Self::Manager,
        Self::Rh,
        Self::Admin,
        Self::SuperAdmin,
    ];
}

impl fmt::Display for LegacyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Only pending requests accept a decision or a cancellation.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveKind {
    Vacation,
    Sick,
    Unpaid,
    Other,
}

impl LeaveKind {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "vacation" => Some(Self::Vacation),
            "sick" => Some(Self::Sick),
            "unpaid" => Some(Self::Unpaid),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vacation => "vacation",
            Self::Sick => "sick",
            Self::Unpaid => "unpaid",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for LeaveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of an expense report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Rejected,
}

impl ExpenseStatus {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(Self::Todo),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a performance review.
///
/// Draft reviews are editable by the reviewer; submission locks the
/// content and hands the review to the employee for acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Draft,
    Submitted,
    Acknowledged,
}

impl ReviewStatus {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            "acknowledged" => Some(Self::Acknowledged),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Acknowledged => "acknowledged",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_role_round_trip() {
        for role in LegacyRole::ALL {
            assert_eq!(LegacyRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(LegacyRole::parse("INTERN"), None);
        assert_eq!(LegacyRole::parse("employee"), None);
    }

    #[test]
    fn leave_status_openness() {
        assert!(LeaveStatus::Pending.is_open());
        assert!(!LeaveStatus::Approved.is_open());
        assert!(!LeaveStatus::Rejected.is_open());
        assert!(!LeaveStatus::Cancelled.is_open());
    }

    #[test]
    fn status_strings_round_trip() {
        for s in ["pending", "approved", "rejected", "cancelled"] {
            assert_eq!(LeaveStatus::parse(s).map(|v| v.as_str()), Some(s));
        }
        for s in ["todo", "in_progress", "done"] {
            assert_eq!(TaskStatus::parse(s).map(|v| v.as_str()), Some(s));
        }
        for s in ["draft", "submitted", "acknowledged"] {
            assert_eq!(ReviewStatus::parse(s).map(|v| v.as_str()), Some(s));
        }
    }
}
