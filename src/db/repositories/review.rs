use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::ReviewStatus;
use crate::entities::{performance_reviews, prelude::*};

pub struct ReviewDraft {
    pub employee_id: i32,
    pub reviewer_id: i32,
    pub period: String,
    pub rating: Option<i32>,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
}

pub struct ReviewRepository {
    conn: DatabaseConnection,
}

impl ReviewRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, draft: ReviewDraft) -> Result<performance_reviews::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = PerformanceReviews::insert(performance_reviews::ActiveModel {
            employee_id: Set(draft.employee_id),
            reviewer_id: Set(draft.reviewer_id),
            period: Set(draft.period),
            rating: Set(draft.rating),
            strengths: Set(draft.strengths),
            improvements: Set(draft.improvements),
            status: Set(ReviewStatus::Draft.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await?;

        let model = PerformanceReviews::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created review"))?;

        Ok(model)
    }

    pub async fn get(&self, id: i32) -> Result<Option<performance_reviews::Model>> {
        Ok(PerformanceReviews::find_by_id(id).one(&self.conn).await?)
    }

    /// Reviews about one employee, newest period first.
    pub async fn list_for_employee(
        &self,
        employee_id: i32,
    ) -> Result<Vec<performance_reviews::Model>> {
        Ok(PerformanceReviews::find()
            .filter(performance_reviews::Column::EmployeeId.eq(employee_id))
            .order_by_desc(performance_reviews::Column::Period)
            .all(&self.conn)
            .await?)
    }

    pub async fn list_all(&self) -> Result<Vec<performance_reviews::Model>> {
        Ok(PerformanceReviews::find()
            .order_by_desc(performance_reviews::Column::Period)
            .order_by_desc(performance_reviews::Column::CreatedAt)
            .all(&self.conn)
            .await?)
    }

    pub async fn update_draft(
        &self,
        id: i32,
        draft: ReviewDraft,
    ) -> Result<Option<performance_reviews::Model>> {
        let Some(review) = PerformanceReviews::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: performance_reviews::ActiveModel = review.into();
        active.employee_id = Set(draft.employee_id);
        active.reviewer_id = Set(draft.reviewer_id);
        active.period = Set(draft.period);
        active.rating = Set(draft.rating);
        active.strengths = Set(draft.strengths);
        active.improvements = Set(draft.improvements);
        active.updated_at = Set(now);
        let model = active.update(&self.conn).await?;

        Ok(Some(model))
    }

    pub async fn mark_submitted(&self, id: i32) -> Result<Option<performance_reviews::Model>> {
        let Some(review) = PerformanceReviews::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: performance_reviews::ActiveModel = review.into();
        active.status = Set(ReviewStatus::Submitted.as_str().to_string());
        active.submitted_at = Set(Some(now.clone()));
        active.updated_at = Set(now);
        let model = active.update(&self.conn).await?;

        Ok(Some(model))
    }

    pub async fn mark_acknowledged(
        &self,
        id: i32,
    ) -> Result<Option<performance_reviews::Model>> {
        let Some(review) = PerformanceReviews::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: performance_reviews::ActiveModel = review.into();
        active.status = Set(ReviewStatus::Acknowledged.as_str().to_string());
        active.acknowledged_at = Set(Some(now.clone()));
        active.updated_at = Set(now);
        let model = active.update(&self.conn).await?;

        Ok(Some(model))
    }

    /// Submitted but unacknowledged reviews older than the cutoff, for
    /// the reminder job.
    pub async fn list_submitted_before(
        &self,
        cutoff_rfc3339: &str,
    ) -> Result<Vec<performance_reviews::Model>> {
        Ok(PerformanceReviews::find()
            .filter(performance_reviews::Column::Status.eq(ReviewStatus::Submitted.as_str()))
            .filter(performance_reviews::Column::SubmittedAt.lt(cutoff_rfc3339))
            .all(&self.conn)
            .await?)
    }
}
