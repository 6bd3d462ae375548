use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::ExpenseStatus;
use crate::entities::{expense_reports, prelude::*};

pub struct ExpenseRepository {
    conn: DatabaseConnection,
}

impl ExpenseRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        user_id: i32,
        description: &str,
        amount_cents: i64,
        currency: &str,
        expense_date: &str,
    ) -> Result<expense_reports::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = ExpenseReports::insert(expense_reports::ActiveModel {
            user_id: Set(user_id),
            description: Set(description.to_string()),
            amount_cents: Set(amount_cents),
            currency: Set(currency.to_string()),
            expense_date: Set(expense_date.to_string()),
            status: Set(ExpenseStatus::Pending.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await?;

        let model = ExpenseReports::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created expense report"))?;

        Ok(model)
    }

    pub async fn get(&self, id: i32) -> Result<Option<expense_reports::Model>> {
        Ok(ExpenseReports::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<expense_reports::Model>> {
        Ok(ExpenseReports::find()
            .filter(expense_reports::Column::UserId.eq(user_id))
            .order_by_desc(expense_reports::Column::ExpenseDate)
            .all(&self.conn)
            .await?)
    }

    pub async fn list_all(&self, status: Option<&str>) -> Result<Vec<expense_reports::Model>> {
        let mut query =
            ExpenseReports::find().order_by_desc(expense_reports::Column::ExpenseDate);

        if let Some(status) = status {
            query = query.filter(expense_reports::Column::Status.eq(status));
        }

        Ok(query.all(&self.conn).await?)
    }

    pub async fn decide(
        &self,
        id: i32,
        status: ExpenseStatus,
        decided_by: i32,
        note: Option<String>,
    ) -> Result<Option<expense_reports::Model>> {
        let Some(report) = ExpenseReports::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: expense_reports::ActiveModel = report.into();
        active.status = Set(status.as_str().to_string());
        active.decided_by = Set(Some(decided_by));
        active.decided_at = Set(Some(now.clone()));
        active.decision_note = Set(note);
        active.updated_at = Set(now);
        let model = active.update(&self.conn).await?;

        Ok(Some(model))
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        ExpenseReports::delete_by_id(id).exec(&self.conn).await?;
        Ok(())
    }

    pub async fn count_pending(&self) -> Result<u64> {
        Ok(ExpenseReports::find()
            .filter(expense_reports::Column::Status.eq(ExpenseStatus::Pending.as_str()))
            .count(&self.conn)
            .await?)
    }
}
