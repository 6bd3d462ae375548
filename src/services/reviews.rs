//! Domain service for the performance review lifecycle.

use thiserror::Error;
use tracing::info;

use crate::constants::reviews::{MAX_RATING, MIN_RATING};
use crate::db::{ReviewDraft, Store};
use crate::domain::ReviewStatus;
use crate::domain::events::NotificationEvent;
use crate::entities::performance_reviews;
use crate::services::Notifier;

/// Errors specific to review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Review not found")]
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

impl From<anyhow::Error> for ReviewError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Clone)]
pub struct ReviewService {
    store: Store,
    notifier: Notifier,
}

impl ReviewService {
    #[must_use]
    pub const fn new(store: Store, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    pub async fn create_draft(
        &self,
        draft: ReviewDraft,
    ) -> Result<performance_reviews::Model, ReviewError> {
        self.validate_draft(&draft).await?;

        let review = self.store.create_review(draft).await?;

        info!(review_id = review.id, employee_id = review.employee_id, "Review draft created");

        Ok(review)
    }

    pub async fn update_draft(
        &self,
        id: i32,
        draft: ReviewDraft,
    ) -> Result<performance_reviews::Model, ReviewError> {
        let existing = self.store.get_review(id).await?.ok_or(ReviewError::NotFound)?;

        if existing.status != ReviewStatus::Draft.as_str() {
            return Err(ReviewError::Conflict(
                "Only draft reviews can be edited".to_string(),
            ));
        }

        self.validate_draft(&draft).await?;

        self.store
            .update_review_draft(id, draft)
            .await?
            .ok_or(ReviewError::NotFound)
    }

    /// Locks a draft and notifies the employee.
    pub async fn submit(&self, id: i32) -> Result<performance_reviews::Model, ReviewError> {
        let review = self.store.get_review(id).await?.ok_or(ReviewError::NotFound)?;

        if review.status != ReviewStatus::Draft.as_str() {
            return Err(ReviewError::Conflict(
                "Only draft reviews can be submitted".to_string(),
            ));
        }

        if review.rating.is_none() {
            return Err(ReviewError::Validation(
                "A rating is required before submitting".to_string(),
            ));
        }

        let review = self
            .store
            .mark_review_submitted(id)
            .await?
            .ok_or(ReviewError::NotFound)?;

        info!(review_id = id, employee_id = review.employee_id, "Review submitted");

        self.notifier
            .notify_user(
                review.employee_id,
                "review_submitted",
                &format!("Your {} performance review is ready to read", review.period),
                Some("performance_review"),
                Some(review.id),
            )
            .await?;

        self.notifier.broadcast(NotificationEvent::ReviewSubmitted {
            review_id: review.id,
            employee_id: review.employee_id,
            period: review.period.clone(),
        });

        Ok(review)
    }

    /// The reviewed employee confirms they have read a submitted review.
    pub async fn acknowledge(
        &self,
        id: i32,
        caller_id: i32,
    ) -> Result<performance_reviews::Model, ReviewError> {
        let review = self.store.get_review(id).await?.ok_or(ReviewError::NotFound)?;

        if review.employee_id != caller_id {
            return Err(ReviewError::Forbidden(
                "Only the reviewed employee can acknowledge".to_string(),
            ));
        }

        if review.status != ReviewStatus::Submitted.as_str() {
            return Err(ReviewError::Conflict(
                "Only submitted reviews can be acknowledged".to_string(),
            ));
        }

        let review = self
            .store
            .mark_review_acknowledged(id)
            .await?
            .ok_or(ReviewError::NotFound)?;

        info!(review_id = id, employee_id = review.employee_id, "Review acknowledged");

        self.notifier
            .notify_user(
                review.reviewer_id,
                "review_acknowledged",
                &format!("The {} review you wrote was acknowledged", review.period),
                Some("performance_review"),
                Some(review.id),
            )
            .await?;

        self.notifier.broadcast(NotificationEvent::ReviewAcknowledged {
            review_id: review.id,
            employee_id: review.employee_id,
        });

        Ok(review)
    }

    async fn validate_draft(&self, draft: &ReviewDraft) -> Result<(), ReviewError> {
        if draft.period.trim().is_empty() {
            return Err(ReviewError::Validation("Period is required".to_string()));
        }

        if let Some(rating) = draft.rating
            && !(MIN_RATING..=MAX_RATING).contains(&rating)
        {
            return Err(ReviewError::Validation(format!(
                "Rating must be between {MIN_RATING} and {MAX_RATING}"
            )));
        }

        let employee = self.store.get_user_by_id(draft.employee_id).await?;
        if !employee.is_some_and(|u| u.active) {
            return Err(ReviewError::Validation(
                "Employee not found or inactive".to_string(),
            ));
        }

        Ok(())
    }
}
