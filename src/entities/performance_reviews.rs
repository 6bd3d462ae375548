use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "performance_reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub employee_id: i32,

    pub reviewer_id: i32,

    /// Review period label (`2026-H1`, `2026-Q3`, ...).
    pub period: String,

    /// 1..=5, required before submission.
    pub rating: Option<i32>,

    pub strengths: Option<String>,

    pub improvements: Option<String>,

    /// `draft`, `submitted`, `acknowledged`
    pub status: String,

    pub submitted_at: Option<String>,

    pub acknowledged_at: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::EmployeeId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Employee,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
