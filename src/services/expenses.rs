//! Domain service for the expense report workflow.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::db::Store;
use crate::domain::ExpenseStatus;
use crate::domain::events::NotificationEvent;
use crate::domain::permissions::EXPENSES_APPROVE;
use crate::entities::expense_reports;
use crate::services::Notifier;

/// Errors specific to expense operations.
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("Expense report not found")]
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

impl From<anyhow::Error> for ExpenseError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Clone)]
pub struct ExpenseService {
    store: Store,
    notifier: Notifier,
}

impl ExpenseService {
    #[must_use]
    pub const fn new(store: Store, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    /// Submits an expense report. Amounts are minor units (cents); currency
    /// falls back to the configured company default when omitted.
    pub async fn submit(
        &self,
        user_id: i32,
        user_name: &str,
        description: &str,
        amount_cents: i64,
        currency: Option<String>,
        expense_date: &str,
        default_currency: &str,
    ) -> Result<expense_reports::Model, ExpenseError> {
        if description.trim().is_empty() {
            return Err(ExpenseError::Validation(
                "Description is required".to_string(),
            ));
        }

        if amount_cents < 0 {
            return Err(ExpenseError::Validation(
                "Amount must not be negative".to_string(),
            ));
        }

        if NaiveDate::parse_from_str(expense_date, "%Y-%m-%d").is_err() {
            return Err(ExpenseError::Validation(format!(
                "'{expense_date}' is not a YYYY-MM-DD date"
            )));
        }

        let currency = match currency {
            Some(c) if !c.trim().is_empty() => c.trim().to_uppercase(),
            _ => default_currency.to_string(),
        };

        let expense = self
            .store
            .create_expense_report(
                user_id,
                description.trim(),
                amount_cents,
                &currency,
                expense_date,
            )
            .await?;

        info!(expense_id = expense.id, user_id, amount_cents, "Expense report submitted");

        self.notifier
            .notify_holders(
                EXPENSES_APPROVE,
                "expense_report",
                &format!(
                    "{user_name} submitted an expense of {}.{:02} {currency}",
                    amount_cents / 100,
                    amount_cents % 100
                ),
                Some("expense_report"),
                Some(expense.id),
            )
            .await?;

        self.notifier.broadcast(NotificationEvent::ExpenseSubmitted {
            expense_id: expense.id,
            user_id,
            user_name: user_name.to_string(),
            amount_cents,
            currency,
        });

        Ok(expense)
    }

    /// Approves or rejects a pending report.
    pub async fn decide(
        &self,
        id: i32,
        approve: bool,
        note: Option<String>,
        decided_by: i32,
        decided_by_name: &str,
    ) -> Result<expense_reports::Model, ExpenseError> {
        let expense = self
            .store
            .get_expense_report(id)
            .await?
            .ok_or(ExpenseError::NotFound)?;

        if expense.status != ExpenseStatus::Pending.as_str() {
            return Err(ExpenseError::Conflict(
                "Only pending reports can be decided".to_string(),
            ));
        }

        let status = if approve {
            ExpenseStatus::Approved
        } else {
            ExpenseStatus::Rejected
        };

        let expense = self
            .store
            .decide_expense_report(id, status, decided_by, note)
            .await?
            .ok_or(ExpenseError::NotFound)?;

        info!(expense_id = id, approve, decided_by, "Expense report decided");

        let verdict = if approve { "approved" } else { "rejected" };
        self.notifier
            .notify_user(
                expense.user_id,
                "expense_decision",
                &format!(
                    "Your expense report '{}' was {verdict} by {decided_by_name}",
                    expense.description
                ),
                Some("expense_report"),
                Some(expense.id),
            )
            .await?;

        self.notifier.broadcast(NotificationEvent::ExpenseDecided {
            expense_id: expense.id,
            user_id: expense.user_id,
            approved: approve,
            decided_by: decided_by_name.to_string(),
        });

        Ok(expense)
    }

    /// Deletes the caller's own pending report.
    pub async fn delete_own(&self, id: i32, user_id: i32) -> Result<(), ExpenseError> {
        let expense = self
            .store
            .get_expense_report(id)
            .await?
            .ok_or(ExpenseError::NotFound)?;

        if expense.user_id != user_id {
            return Err(ExpenseError::Forbidden(
                "Only the submitter can delete an expense report".to_string(),
            ));
        }

        if expense.status != ExpenseStatus::Pending.as_str() {
            return Err(ExpenseError::Conflict(
                "Only pending reports can be deleted".to_string(),
            ));
        }

        self.store.delete_expense_report(id).await?;

        info!(expense_id = id, user_id, "Expense report deleted");

        Ok(())
    }
}
