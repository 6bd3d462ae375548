use std::collections::{HashMap, HashSet};

use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::permissions as catalog;
use crate::domain::{LegacyRole, permissions::legacy_role_permissions};
use crate::entities::{permissions, prelude::*, role_permissions, roles, users};

/// Role fields as submitted through the editor. The permission list is
/// names only; rows are created lazily for unknown names.
pub struct RoleInput {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub permissions: Vec<String>,
}

pub struct RoleRepository {
    conn: DatabaseConnection,
}

impl RoleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Resolves the effective permission set of a user: the union of the
    /// legacy enum mapping, the relational join and the role's JSON
    /// column. Unknown users resolve to the empty set; users with no
    /// role of either kind get the view-only defaults.
    pub async fn resolve_permission_names(&self, user_id: i32) -> Result<HashSet<String>> {
        let Some(user) = Users::find_by_id(user_id).one(&self.conn).await? else {
            return Ok(HashSet::new());
        };

        let mut resolved = HashSet::new();

        let legacy = user.legacy_role.as_deref().and_then(LegacyRole::parse);
        if let Some(role) = legacy {
            resolved.extend(
                legacy_role_permissions(role)
                    .into_iter()
                    .map(ToString::to_string),
            );
        }

        if let Some(role_id) = user.role_id {
            let links = RolePermissions::find()
                .filter(role_permissions::Column::RoleId.eq(role_id))
                .find_also_related(Permissions)
                .all(&self.conn)
                .await?;
            for (_, permission) in links {
                if let Some(permission) = permission {
                    resolved.insert(permission.name);
                }
            }

            if let Some(role) = Roles::find_by_id(role_id).one(&self.conn).await? {
                match serde_json::from_str::<Vec<String>>(&role.permissions_json) {
                    Ok(names) => resolved.extend(names),
                    Err(e) => {
                        tracing::warn!(
                            role_id,
                            error = %e,
                            "Ignoring malformed permissions JSON on role"
                        );
                    }
                }
            }
        }

        if legacy.is_none() && user.role_id.is_none() {
            resolved.extend(
                catalog::DEFAULT_PERMISSIONS
                    .iter()
                    .map(ToString::to_string),
            );
        }

        Ok(resolved)
    }

    /// Active users whose resolved set would contain `permission`; used
    /// for approval fan-out. Mirrors the three resolver sources without
    /// resolving every account one by one.
    pub async fn user_ids_holding(&self, permission: &str) -> Result<Vec<i32>> {
        let legacy_holders: Vec<&str> = LegacyRole::ALL
            .iter()
            .filter(|role| legacy_role_permissions(**role).contains(&permission))
            .map(|role| role.as_str())
            .collect();

        let mut role_ids: HashSet<i32> = HashSet::new();
        if let Some(perm) = Permissions::find()
            .filter(permissions::Column::Name.eq(permission))
            .one(&self.conn)
            .await?
        {
            let links = RolePermissions::find()
                .filter(role_permissions::Column::PermissionId.eq(perm.id))
                .all(&self.conn)
                .await?;
            role_ids.extend(links.into_iter().map(|l| l.role_id));
        }
        for role in Roles::find().all(&self.conn).await? {
            if let Ok(names) = serde_json::from_str::<Vec<String>>(&role.permissions_json)
                && names.iter().any(|n| n == permission)
            {
                role_ids.insert(role.id);
            }
        }

        let mut condition = Condition::any()
            .add(users::Column::LegacyRole.is_in(legacy_holders))
            .add(users::Column::RoleId.is_in(role_ids));
        if catalog::DEFAULT_PERMISSIONS.contains(&permission) {
            condition = condition.add(
                Condition::all()
                    .add(users::Column::LegacyRole.is_null())
                    .add(users::Column::RoleId.is_null()),
            );
        }

        let holders = Users::find()
            .filter(users::Column::Active.eq(true))
            .filter(condition)
            .all(&self.conn)
            .await?;

        Ok(holders.into_iter().map(|u| u.id).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<roles::Model>> {
        Ok(Roles::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<roles::Model>> {
        Ok(Roles::find()
            .filter(roles::Column::Name.eq(name))
            .one(&self.conn)
            .await?)
    }

    /// All roles with their permission names re-read from the join table.
    pub async fn list_with_permissions(&self) -> Result<Vec<(roles::Model, Vec<String>)>> {
        let roles = Roles::find()
            .order_by_asc(roles::Column::Name)
            .all(&self.conn)
            .await?;

        let names: HashMap<i32, String> = Permissions::find()
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        let mut by_role: HashMap<i32, Vec<String>> = HashMap::new();
        for link in RolePermissions::find().all(&self.conn).await? {
            if let Some(name) = names.get(&link.permission_id) {
                by_role.entry(link.role_id).or_default().push(name.clone());
            }
        }

        Ok(roles
            .into_iter()
            .map(|role| {
                let mut permissions = by_role.remove(&role.id).unwrap_or_default();
                permissions.sort();
                (role, permissions)
            })
            .collect())
    }

    /// Permission names of one role, re-read from the join table.
    pub async fn permission_names(&self, role_id: i32) -> Result<Vec<String>> {
        let links = RolePermissions::find()
            .filter(role_permissions::Column::RoleId.eq(role_id))
            .find_also_related(Permissions)
            .all(&self.conn)
            .await?;

        let mut names: Vec<String> = links
            .into_iter()
            .filter_map(|(_, permission)| permission.map(|p| p.name))
            .collect();
        names.sort();
        Ok(names)
    }

    /// The full permission table, for the grouped catalog display.
    pub async fn list_permission_rows(&self) -> Result<Vec<permissions::Model>> {
        Ok(Permissions::find()
            .order_by_asc(permissions::Column::Category)
            .order_by_asc(permissions::Column::Name)
            .all(&self.conn)
            .await?)
    }

    pub async fn create(&self, input: RoleInput) -> Result<roles::Model> {
        let txn = self.conn.begin().await?;
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = Roles::insert(roles::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            color: Set(input.color),
            icon: Set(input.icon),
            is_system: Set(false),
            permissions_json: Set("[]".to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&txn)
        .await?;

        let role_id = inserted.last_insert_id;
        let permission_ids = ensure_permissions(&txn, &input.permissions).await?;
        insert_links(&txn, role_id, &permission_ids).await?;

        let model = Roles::find_by_id(role_id)
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created role"))?;

        txn.commit().await?;
        Ok(model)
    }

    /// Full replacement of the role's permission links: every existing
    /// join row is deleted and the submitted list recreated. No diffing.
    pub async fn update(&self, id: i32, input: RoleInput) -> Result<Option<roles::Model>> {
        let txn = self.conn.begin().await?;

        let Some(role) = Roles::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: roles::ActiveModel = role.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.color = Set(input.color);
        active.icon = Set(input.icon);
        active.updated_at = Set(now);
        let model = active.update(&txn).await?;

        let permission_ids = ensure_permissions(&txn, &input.permissions).await?;

        RolePermissions::delete_many()
            .filter(role_permissions::Column::RoleId.eq(id))
            .exec(&txn)
            .await?;

        insert_links(&txn, id, &permission_ids).await?;

        txn.commit().await?;
        Ok(Some(model))
    }

    /// Deletes the role and its links. Protection rules (system roles,
    /// assigned users) are enforced by the caller.
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.conn.begin().await?;

        RolePermissions::delete_many()
            .filter(role_permissions::Column::RoleId.eq(id))
            .exec(&txn)
            .await?;

        Roles::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}

/// Makes sure a permission row exists for every submitted name, creating
/// missing ones with a derived label and category. Returns the ids,
/// deduplicated, in submission order.
async fn ensure_permissions<C: ConnectionTrait>(conn: &C, names: &[String]) -> Result<Vec<i32>> {
    let mut ids = Vec::with_capacity(names.len());
    let mut seen = HashSet::new();

    for raw in names {
        let name = raw.trim();
        if name.is_empty() || !seen.insert(name.to_string()) {
            continue;
        }

        let existing = Permissions::find()
            .filter(permissions::Column::Name.eq(name))
            .one(conn)
            .await?;

        let id = match existing {
            Some(permission) => permission.id,
            None => {
                let inserted = Permissions::insert(permissions::ActiveModel {
                    name: Set(name.to_string()),
                    label: Set(catalog::label_for(name)),
                    description: Set(None),
                    category: Set(catalog::category_of(name).to_string()),
                    created_at: Set(chrono::Utc::now().to_rfc3339()),
                    ..Default::default()
                })
                .exec(conn)
                .await?;
                inserted.last_insert_id
            }
        };

        ids.push(id);
    }

    Ok(ids)
}

async fn insert_links<C: ConnectionTrait>(
    conn: &C,
    role_id: i32,
    permission_ids: &[i32],
) -> Result<()> {
    if permission_ids.is_empty() {
        return Ok(());
    }

    let links: Vec<role_permissions::ActiveModel> = permission_ids
        .iter()
        .map(|permission_id| role_permissions::ActiveModel {
            role_id: Set(role_id),
            permission_id: Set(*permission_id),
            ..Default::default()
        })
        .collect();

    RolePermissions::insert_many(links).exec(conn).await?;
    Ok(())
}
