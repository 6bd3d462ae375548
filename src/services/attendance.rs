//! Domain service for attendance clock-in/out.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::db::Store;
use crate::entities::attendance_records;
use crate::services::leaves::today;

/// Errors specific to attendance operations.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AttendanceError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Clone)]
pub struct AttendanceService {
    store: Store,
}

impl AttendanceService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Opens today's attendance record. One record per user per day; the
    /// unique index backs this up against races.
    pub async fn clock_in(
        &self,
        user_id: i32,
        note: Option<String>,
    ) -> Result<attendance_records::Model, AttendanceError> {
        let date = today();

        if self.store.get_attendance_for_day(user_id, &date).await?.is_some() {
            return Err(AttendanceError::Conflict(
                "Already clocked in today".to_string(),
            ));
        }

        let record = self
            .store
            .clock_in(user_id, &date, &Utc::now().to_rfc3339(), note)
            .await?;

        info!(user_id, date = %date, "Clocked in");

        Ok(record)
    }

    /// Closes today's record and computes worked minutes.
    pub async fn clock_out(
        &self,
        user_id: i32,
    ) -> Result<attendance_records::Model, AttendanceError> {
        let date = today();

        let record = self
            .store
            .get_attendance_for_day(user_id, &date)
            .await?
            .ok_or_else(|| {
                AttendanceError::Validation("No clock-in recorded today".to_string())
            })?;

        if record.clock_out.is_some() {
            return Err(AttendanceError::Conflict(
                "Already clocked out today".to_string(),
            ));
        }

        let clocked_in = DateTime::parse_from_rfc3339(&record.clock_in)
            .map_err(|e| AttendanceError::Internal(format!("Bad clock-in timestamp: {e}")))?
            .with_timezone(&Utc);

        let now = Utc::now();
        let worked_minutes = i32::try_from((now - clocked_in).num_minutes().max(0))
            .unwrap_or(i32::MAX);

        let record = self
            .store
            .set_clock_out(record.id, &now.to_rfc3339(), worked_minutes)
            .await?
            .ok_or_else(|| AttendanceError::Internal("Attendance record vanished".to_string()))?;

        info!(user_id, date = %date, worked_minutes, "Clocked out");

        Ok(record)
    }
}
