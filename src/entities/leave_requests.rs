use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leave_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    /// `vacation`, `sick`, `unpaid`, `other`
    pub kind: String,

    /// `YYYY-MM-DD`, inclusive
    pub start_date: String,

    /// `YYYY-MM-DD`, inclusive
    pub end_date: String,

    /// Week days in the range, computed at submission.
    pub business_days: i32,

    pub reason: Option<String>,

    /// `pending`, `approved`, `rejected`, `cancelled`
    pub status: String,

    pub decided_by: Option<i32>,

    pub decided_at: Option<String>,

    pub decision_note: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
