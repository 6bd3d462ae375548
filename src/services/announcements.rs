//! Domain service for company announcements.

use thiserror::Error;
use tracing::info;

use crate::db::Store;
use crate::domain::events::NotificationEvent;
use crate::entities::announcements;
use crate::services::Notifier;

/// Errors specific to announcement operations.
#[derive(Debug, Error)]
pub enum AnnouncementError {
    #[error("Announcement not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AnnouncementError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Clone)]
pub struct AnnouncementService {
    store: Store,
    notifier: Notifier,
}

impl AnnouncementService {
    #[must_use]
    pub const fn new(store: Store, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    /// Publishes an announcement and notifies every active user.
    pub async fn publish(
        &self,
        title: &str,
        body: &str,
        pinned: bool,
        author_id: i32,
    ) -> Result<announcements::Model, AnnouncementError> {
        validate_fields(title, body)?;

        let announcement = self
            .store
            .create_announcement(title.trim(), body.trim(), pinned, author_id)
            .await?;

        info!(announcement_id = announcement.id, pinned, "Announcement published");

        let notified = self
            .notifier
            .notify_all_active(
                "announcement",
                &format!("New announcement: {}", announcement.title),
                Some("announcement"),
                Some(announcement.id),
            )
            .await?;

        info!(announcement_id = announcement.id, notified, "Announcement fan-out complete");

        self.notifier
            .broadcast(NotificationEvent::AnnouncementPublished {
                announcement_id: announcement.id,
                title: announcement.title.clone(),
            });

        Ok(announcement)
    }

    /// Edits an announcement in place. No re-notification.
    pub async fn update(
        &self,
        id: i32,
        title: &str,
        body: &str,
        pinned: bool,
    ) -> Result<announcements::Model, AnnouncementError> {
        validate_fields(title, body)?;

        self.store
            .update_announcement(id, title.trim(), body.trim(), pinned)
            .await?
            .ok_or(AnnouncementError::NotFound)
    }

    pub async fn delete(&self, id: i32) -> Result<(), AnnouncementError> {
        self.store
            .get_announcement(id)
            .await?
            .ok_or(AnnouncementError::NotFound)?;

        self.store.delete_announcement(id).await?;

        info!(announcement_id = id, "Announcement deleted");

        Ok(())
    }
}

fn validate_fields(title: &str, body: &str) -> Result<(), AnnouncementError> {
    if title.trim().is_empty() {
        return Err(AnnouncementError::Validation("Title is required".to_string()));
    }
    if body.trim().is_empty() {
        return Err(AnnouncementError::Validation("Body is required".to_string()));
    }
    Ok(())
}
