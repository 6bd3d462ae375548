use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::{notifications, prelude::*};

pub struct NotificationRepository {
    conn: DatabaseConnection,
}

impl NotificationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(
        &self,
        user_id: i32,
        kind: &str,
        message: &str,
        entity_type: Option<&str>,
        entity_id: Option<i32>,
    ) -> Result<notifications::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = Notifications::insert(notifications::ActiveModel {
            user_id: Set(user_id),
            kind: Set(kind.to_string()),
            message: Set(message.to_string()),
            entity_type: Set(entity_type.map(ToString::to_string)),
            entity_id: Set(entity_id),
            read: Set(false),
            created_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await?;

        let model = Notifications::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created notification"))?;

        Ok(model)
    }

    /// One row per recipient, single insert.
    pub async fn add_many(
        &self,
        user_ids: &[i32],
        kind: &str,
        message: &str,
        entity_type: Option<&str>,
        entity_id: Option<i32>,
    ) -> Result<()> {
        if user_ids.is_empty() {
            return Ok(());
        }

        let now = chrono::Utc::now().to_rfc3339();

        let rows: Vec<notifications::ActiveModel> = user_ids
            .iter()
            .map(|user_id| notifications::ActiveModel {
                user_id: Set(*user_id),
                kind: Set(kind.to_string()),
                message: Set(message.to_string()),
                entity_type: Set(entity_type.map(ToString::to_string)),
                entity_id: Set(entity_id),
                read: Set(false),
                created_at: Set(now.clone()),
                ..Default::default()
            })
            .collect();

        Notifications::insert_many(rows).exec(&self.conn).await?;
        Ok(())
    }

    pub async fn list_for_user(
        &self,
        user_id: i32,
        unread_only: bool,
        limit: u64,
    ) -> Result<Vec<notifications::Model>> {
        let mut query = Notifications::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .order_by_desc(notifications::Column::CreatedAt)
            .limit(limit);

        if unread_only {
            query = query.filter(notifications::Column::Read.eq(false));
        }

        Ok(query.all(&self.conn).await?)
    }

    /// Marks one notification read, scoped to its owner. Returns false
    /// when the row does not exist or belongs to someone else.
    pub async fn mark_read(&self, id: i32, user_id: i32) -> Result<bool> {
        let result = Notifications::update_many()
            .col_expr(notifications::Column::Read, Expr::value(true))
            .filter(notifications::Column::Id.eq(id))
            .filter(notifications::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn mark_all_read(&self, user_id: i32) -> Result<u64> {
        let result = Notifications::update_many()
            .col_expr(notifications::Column::Read, Expr::value(true))
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::Read.eq(false))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn count_unread(&self, user_id: i32) -> Result<u64> {
        Ok(Notifications::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::Read.eq(false))
            .count(&self.conn)
            .await?)
    }

    /// Drops read notifications older than the cutoff.
    pub async fn prune_read_before(&self, cutoff_rfc3339: &str) -> Result<u64> {
        let result = Notifications::delete_many()
            .filter(notifications::Column::Read.eq(true))
            .filter(notifications::Column::CreatedAt.lt(cutoff_rfc3339))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}
