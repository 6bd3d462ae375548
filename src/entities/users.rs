use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Random API key (64-char hex string)
    pub api_key: String,

    pub first_name: String,

    pub last_name: String,

    pub department: Option<String>,

    pub job_title: Option<String>,

    /// `YYYY-MM-DD`
    pub hire_date: Option<String>,

    pub manager_id: Option<i32>,

    /// Legacy role enum (`EMPLOYEE`, `MANAGER`, `RH`, `ADMIN`, `SUPER_ADMIN`).
    /// Nullable; resolved through the static mapping.
    pub legacy_role: Option<String>,

    /// Relational role, resolved through the join table and the role's
    /// JSON permission column.
    pub role_id: Option<i32>,

    pub active: bool,

    /// Forces password rotation on first login/bootstrap.
    pub must_change_password: bool,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::roles::Entity",
        from = "Column::RoleId",
        to = "super::roles::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Role,
}

impl Related<super::roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
