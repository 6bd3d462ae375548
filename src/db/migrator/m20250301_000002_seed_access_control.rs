use crate::domain::{LegacyRole, permissions as catalog};
use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::Query;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Default API key (rotate it right after bootstrap)
const DEFAULT_API_KEY: &str = "cadre_default_api_key_please_regenerate";

/// Fixed id of the seeded Administrator role.
const ADMIN_ROLE_ID: i32 = 1;

/// Hash the default password using Argon2id
fn hash_default_password() -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let password = b"password";
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password, &salt)
        .expect("Failed to hash default password")
        .to_string()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        // Permission catalog, with fixed ids so the role links below can
        // reference them without a read-back.
        let mut insert_permissions = Query::insert()
            .into_table(Permissions)
            .columns([
                crate::entities::permissions::Column::Id,
                crate::entities::permissions::Column::Name,
                crate::entities::permissions::Column::Label,
                crate::entities::permissions::Column::Description,
                crate::entities::permissions::Column::Category,
                crate::entities::permissions::Column::CreatedAt,
            ])
            .to_owned();
        for (id, def) in (1i32..).zip(catalog::CATALOG.iter()) {
            insert_permissions.values_panic([
                id.into(),
                def.key.into(),
                def.label.into(),
                def.description.into(),
                def.category.into(),
                now.clone().into(),
            ]);
        }
        manager.exec_stmt(insert_permissions).await?;

        // Administrator system role. The JSON column is stamped here and
        // never rewritten by the API; the join rows below are the
        // relationally maintained source.
        let all_names: Vec<&str> = catalog::CATALOG.iter().map(|d| d.key).collect();
        let permissions_json =
            serde_json::to_string(&all_names).expect("serialize permission names");

        let insert_role = Query::insert()
            .into_table(Roles)
            .columns([
                crate::entities::roles::Column::Id,
                crate::entities::roles::Column::Name,
                crate::entities::roles::Column::Description,
                crate::entities::roles::Column::Color,
                crate::entities::roles::Column::Icon,
                crate::entities::roles::Column::IsSystem,
                crate::entities::roles::Column::PermissionsJson,
                crate::entities::roles::Column::CreatedAt,
                crate::entities::roles::Column::UpdatedAt,
            ])
            .values_panic([
                ADMIN_ROLE_ID.into(),
                "Administrator".into(),
                "Full access to every module".into(),
                "#b91c1c".into(),
                "shield".into(),
                true.into(),
                permissions_json.into(),
                now.clone().into(),
                now.clone().into(),
            ])
            .to_owned();
        manager.exec_stmt(insert_role).await?;

        let mut insert_links = Query::insert()
            .into_table(RolePermissions)
            .columns([
                crate::entities::role_permissions::Column::RoleId,
                crate::entities::role_permissions::Column::PermissionId,
            ])
            .to_owned();
        for (permission_id, _) in (1i32..).zip(catalog::CATALOG.iter()) {
            insert_links.values_panic([ADMIN_ROLE_ID.into(), permission_id.into()]);
        }
        manager.exec_stmt(insert_links).await?;

        // Bootstrap admin account: legacy SUPER_ADMIN plus the
        // Administrator role, so all three resolver sources are live.
        let password_hash = hash_default_password();
        let insert_admin = Query::insert()
            .into_table(Users)
            .columns([
                crate::entities::users::Column::Username,
                crate::entities::users::Column::Email,
                crate::entities::users::Column::PasswordHash,
                crate::entities::users::Column::ApiKey,
                crate::entities::users::Column::FirstName,
                crate::entities::users::Column::LastName,
                crate::entities::users::Column::LegacyRole,
                crate::entities::users::Column::RoleId,
                crate::entities::users::Column::Active,
                crate::entities::users::Column::MustChangePassword,
                crate::entities::users::Column::CreatedAt,
                crate::entities::users::Column::UpdatedAt,
            ])
            .values_panic([
                "admin".into(),
                "admin@cadre.local".into(),
                password_hash.into(),
                DEFAULT_API_KEY.into(),
                "System".into(),
                "Administrator".into(),
                LegacyRole::SuperAdmin.as_str().into(),
                ADMIN_ROLE_ID.into(),
                true.into(),
                true.into(),
                now.clone().into(),
                now.into(),
            ])
            .to_owned();
        manager.exec_stmt(insert_admin).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared("DELETE FROM users WHERE username = 'admin'")
            .await?;
        conn.execute_unprepared("DELETE FROM role_permissions WHERE role_id = 1")
            .await?;
        conn.execute_unprepared("DELETE FROM roles WHERE id = 1")
            .await?;
        conn.execute_unprepared("DELETE FROM permissions").await?;

        Ok(())
    }
}
