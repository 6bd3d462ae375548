use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::LeaveStatus;
use crate::entities::{leave_requests, prelude::*};

pub struct LeaveRepository {
    conn: DatabaseConnection,
}

impl LeaveRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        user_id: i32,
        kind: &str,
        start_date: &str,
        end_date: &str,
        business_days: i32,
        reason: Option<String>,
    ) -> Result<leave_requests::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = LeaveRequests::insert(leave_requests::ActiveModel {
            user_id: Set(user_id),
            kind: Set(kind.to_string()),
            start_date: Set(start_date.to_string()),
            end_date: Set(end_date.to_string()),
            business_days: Set(business_days),
            reason: Set(reason),
            status: Set(LeaveStatus::Pending.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await?;

        let model = LeaveRequests::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created leave request"))?;

        Ok(model)
    }

    pub async fn get(&self, id: i32) -> Result<Option<leave_requests::Model>> {
        Ok(LeaveRequests::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<leave_requests::Model>> {
        Ok(LeaveRequests::find()
            .filter(leave_requests::Column::UserId.eq(user_id))
            .order_by_desc(leave_requests::Column::StartDate)
            .all(&self.conn)
            .await?)
    }

    /// Team view across all users, optionally narrowed to one status.
    pub async fn list_all(&self, status: Option<&str>) -> Result<Vec<leave_requests::Model>> {
        let mut query =
            LeaveRequests::find().order_by_desc(leave_requests::Column::StartDate);

        if let Some(status) = status {
            query = query.filter(leave_requests::Column::Status.eq(status));
        }

        Ok(query.all(&self.conn).await?)
    }

    /// Pending or approved requests of the user crossing the given
    /// inclusive date range. Lexicographic comparison is sound for
    /// `YYYY-MM-DD` strings.
    pub async fn overlapping(
        &self,
        user_id: i32,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<leave_requests::Model>> {
        Ok(LeaveRequests::find()
            .filter(leave_requests::Column::UserId.eq(user_id))
            .filter(leave_requests::Column::Status.is_in([
                LeaveStatus::Pending.as_str(),
                LeaveStatus::Approved.as_str(),
            ]))
            .filter(leave_requests::Column::StartDate.lte(end_date))
            .filter(leave_requests::Column::EndDate.gte(start_date))
            .all(&self.conn)
            .await?)
    }

    pub async fn decide(
        &self,
        id: i32,
        status: LeaveStatus,
        decided_by: i32,
        note: Option<String>,
    ) -> Result<Option<leave_requests::Model>> {
        let Some(request) = LeaveRequests::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: leave_requests::ActiveModel = request.into();
        active.status = Set(status.as_str().to_string());
        active.decided_by = Set(Some(decided_by));
        active.decided_at = Set(Some(now.clone()));
        active.decision_note = Set(note);
        active.updated_at = Set(now);
        let model = active.update(&self.conn).await?;

        Ok(Some(model))
    }

    pub async fn set_status(
        &self,
        id: i32,
        status: LeaveStatus,
    ) -> Result<Option<leave_requests::Model>> {
        let Some(request) = LeaveRequests::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: leave_requests::ActiveModel = request.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(now);
        let model = active.update(&self.conn).await?;

        Ok(Some(model))
    }

    /// Pending requests submitted before the cutoff, for the reminder job.
    pub async fn list_pending_before(
        &self,
        cutoff_rfc3339: &str,
    ) -> Result<Vec<leave_requests::Model>> {
        Ok(LeaveRequests::find()
            .filter(leave_requests::Column::Status.eq(LeaveStatus::Pending.as_str()))
            .filter(leave_requests::Column::CreatedAt.lt(cutoff_rfc3339))
            .order_by_asc(leave_requests::Column::CreatedAt)
            .all(&self.conn)
            .await?)
    }

    pub async fn count_pending(&self) -> Result<u64> {
        Ok(LeaveRequests::find()
            .filter(leave_requests::Column::Status.eq(LeaveStatus::Pending.as_str()))
            .count(&self.conn)
            .await?)
    }

    pub async fn count_pending_for_user(&self, user_id: i32) -> Result<u64> {
        Ok(LeaveRequests::find()
            .filter(leave_requests::Column::UserId.eq(user_id))
            .filter(leave_requests::Column::Status.eq(LeaveStatus::Pending.as_str()))
            .count(&self.conn)
            .await?)
    }

    /// Next approved leave of the user starting today or later.
    pub async fn next_approved_for_user(
        &self,
        user_id: i32,
        today: &str,
    ) -> Result<Option<leave_requests::Model>> {
        Ok(LeaveRequests::find()
            .filter(leave_requests::Column::UserId.eq(user_id))
            .filter(leave_requests::Column::Status.eq(LeaveStatus::Approved.as_str()))
            .filter(leave_requests::Column::StartDate.gte(today))
            .order_by_asc(leave_requests::Column::StartDate)
            .limit(1)
            .one(&self.conn)
            .await?)
    }
}
