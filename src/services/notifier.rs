//! Notification fan-out shared by the workflow services.

use crate::db::Store;
use crate::domain::events::NotificationEvent;
use tokio::sync::broadcast;
use tracing::warn;

/// Persists per-user notification rows and mirrors workflow transitions onto
/// the event bus so SSE clients update without polling.
#[derive(Clone)]
pub struct Notifier {
    store: Store,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl Notifier {
    #[must_use]
    pub const fn new(store: Store, event_bus: broadcast::Sender<NotificationEvent>) -> Self {
        Self { store, event_bus }
    }

    /// Send without caring whether anyone is subscribed.
    pub fn broadcast(&self, event: NotificationEvent) {
        let _ = self.event_bus.send(event);
    }

    pub async fn notify_user(
        &self,
        user_id: i32,
        kind: &str,
        message: &str,
        entity_type: Option<&str>,
        entity_id: Option<i32>,
    ) -> anyhow::Result<()> {
        self.store
            .add_notification(user_id, kind, message, entity_type, entity_id)
            .await?;
        Ok(())
    }

    /// Notifies every active user holding the given permission, resolved
    /// across all three permission sources.
    pub async fn notify_holders(
        &self,
        permission: &str,
        kind: &str,
        message: &str,
        entity_type: Option<&str>,
        entity_id: Option<i32>,
    ) -> anyhow::Result<usize> {
        let user_ids = self.store.user_ids_holding_permission(permission).await?;

        if user_ids.is_empty() {
            warn!(permission, "No active holders to notify");
            return Ok(0);
        }

        self.store
            .add_notifications(&user_ids, kind, message, entity_type, entity_id)
            .await?;

        Ok(user_ids.len())
    }

    pub async fn notify_all_active(
        &self,
        kind: &str,
        message: &str,
        entity_type: Option<&str>,
        entity_id: Option<i32>,
    ) -> anyhow::Result<usize> {
        let user_ids = self.store.list_active_user_ids().await?;

        self.store
            .add_notifications(&user_ids, kind, message, entity_type, entity_id)
            .await?;

        Ok(user_ids.len())
    }
}
