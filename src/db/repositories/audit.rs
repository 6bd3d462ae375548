use crate::entities::{audit_logs, prelude::*};
use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

pub struct AuditRepository {
    conn: DatabaseConnection,
}

impl AuditRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(
        &self,
        event_type: &str,
        level: &str,
        message: &str,
        details: Option<String>,
    ) -> Result<()> {
        let active_model = audit_logs::ActiveModel {
            event_type: Set(event_type.to_string()),
            level: Set(level.to_string()),
            message: Set(message.to_string()),
            details: Set(details),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        AuditLogs::insert(active_model).exec(&self.conn).await?;
        Ok(())
    }

    pub async fn get_entries(
        &self,
        page: u64,
        page_size: u64,
        level_filter: Option<String>,
        event_type_filter: Option<String>,
    ) -> Result<(Vec<audit_logs::Model>, u64)> {
        let mut query = AuditLogs::find().order_by_desc(audit_logs::Column::CreatedAt);

        if let Some(level) = level_filter {
            query = query.filter(audit_logs::Column::Level.eq(level));
        }

        if let Some(event_type) = event_type_filter {
            query = query.filter(audit_logs::Column::EventType.contains(event_type));
        }

        let paginator = query.paginate(&self.conn, page_size);
        let total_pages = paginator.num_pages().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total_pages))
    }

    pub async fn clear(&self) -> Result<()> {
        AuditLogs::delete_many().exec(&self.conn).await?;
        Ok(())
    }

    /// Entries are timestamped RFC 3339 in UTC, so a string cutoff
    /// compares correctly.
    pub async fn prune_before(&self, cutoff_rfc3339: &str) -> Result<u64> {
        let result = AuditLogs::delete_many()
            .filter(audit_logs::Column::CreatedAt.lt(cutoff_rfc3339))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}
