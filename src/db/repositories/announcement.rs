use anyhow::Result;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::entities::{announcements, prelude::*};

pub struct AnnouncementRepository {
    conn: DatabaseConnection,
}

impl AnnouncementRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        title: &str,
        body: &str,
        pinned: bool,
        author_id: i32,
    ) -> Result<announcements::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = Announcements::insert(announcements::ActiveModel {
            title: Set(title.to_string()),
            body: Set(body.to_string()),
            pinned: Set(pinned),
            author_id: Set(author_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await?;

        let model = Announcements::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created announcement"))?;

        Ok(model)
    }

    pub async fn get(&self, id: i32) -> Result<Option<announcements::Model>> {
        Ok(Announcements::find_by_id(id).one(&self.conn).await?)
    }

    /// Pinned first, then newest.
    pub async fn list(&self) -> Result<Vec<announcements::Model>> {
        Ok(Announcements::find()
            .order_by_desc(announcements::Column::Pinned)
            .order_by_desc(announcements::Column::CreatedAt)
            .all(&self.conn)
            .await?)
    }

    pub async fn update(
        &self,
        id: i32,
        title: &str,
        body: &str,
        pinned: bool,
    ) -> Result<Option<announcements::Model>> {
        let Some(announcement) = Announcements::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: announcements::ActiveModel = announcement.into();
        active.title = Set(title.to_string());
        active.body = Set(body.to_string());
        active.pinned = Set(pinned);
        active.updated_at = Set(now);
        let model = active.update(&self.conn).await?;

        Ok(Some(model))
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        Announcements::delete_by_id(id).exec(&self.conn).await?;
        Ok(())
    }
}
