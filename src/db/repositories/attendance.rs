use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{attendance_records, prelude::*};

pub struct AttendanceRepository {
    conn: DatabaseConnection,
}

impl AttendanceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_for_day(
        &self,
        user_id: i32,
        date: &str,
    ) -> Result<Option<attendance_records::Model>> {
        Ok(AttendanceRecords::find()
            .filter(attendance_records::Column::UserId.eq(user_id))
            .filter(attendance_records::Column::Date.eq(date))
            .one(&self.conn)
            .await?)
    }

    pub async fn clock_in(
        &self,
        user_id: i32,
        date: &str,
        clock_in: &str,
        note: Option<String>,
    ) -> Result<attendance_records::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = AttendanceRecords::insert(attendance_records::ActiveModel {
            user_id: Set(user_id),
            date: Set(date.to_string()),
            clock_in: Set(clock_in.to_string()),
            note: Set(note),
            created_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await?;

        let model = AttendanceRecords::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created attendance record"))?;

        Ok(model)
    }

    pub async fn set_clock_out(
        &self,
        id: i32,
        clock_out: &str,
        worked_minutes: i32,
    ) -> Result<Option<attendance_records::Model>> {
        let Some(record) = AttendanceRecords::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: attendance_records::ActiveModel = record.into();
        active.clock_out = Set(Some(clock_out.to_string()));
        active.worked_minutes = Set(Some(worked_minutes));
        let model = active.update(&self.conn).await?;

        Ok(Some(model))
    }

    /// Own records inside an inclusive date range, newest first.
    pub async fn list_for_user(
        &self,
        user_id: i32,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<attendance_records::Model>> {
        let mut query = AttendanceRecords::find()
            .filter(attendance_records::Column::UserId.eq(user_id))
            .order_by_desc(attendance_records::Column::Date);

        if let Some(from) = from {
            query = query.filter(attendance_records::Column::Date.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(attendance_records::Column::Date.lte(to));
        }

        Ok(query.all(&self.conn).await?)
    }

    /// Everyone's records for one day, for the team view.
    pub async fn list_for_day(&self, date: &str) -> Result<Vec<attendance_records::Model>> {
        Ok(AttendanceRecords::find()
            .filter(attendance_records::Column::Date.eq(date))
            .order_by_asc(attendance_records::Column::ClockIn)
            .all(&self.conn)
            .await?)
    }

    pub async fn count_for_day(&self, date: &str) -> Result<u64> {
        Ok(AttendanceRecords::find()
            .filter(attendance_records::Column::Date.eq(date))
            .count(&self.conn)
            .await?)
    }
}
