//! `SeaORM` implementation of the `RoleService` trait.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::broadcast;
use tracing::info;

use crate::db::{RoleInput, Store};
use crate::domain::events::NotificationEvent;
use crate::domain::permissions::category_of;
use crate::entities::roles;
use crate::services::role_service::{
    CatalogEntry, CatalogGroup, RoleDto, RoleError, RoleService,
};

pub struct SeaOrmRoleService {
    store: Store,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl SeaOrmRoleService {
    #[must_use]
    pub const fn new(store: Store, event_bus: broadcast::Sender<NotificationEvent>) -> Self {
        Self { store, event_bus }
    }

    async fn to_dto(&self, role: roles::Model) -> Result<RoleDto, RoleError> {
        let permissions = self.store.role_permission_names(role.id).await?;
        let member_count = self.store.count_users_assigned_to_role(role.id).await?;

        Ok(RoleDto {
            id: role.id,
            name: role.name,
            description: role.description,
            color: role.color,
            icon: role.icon,
            is_system: role.is_system,
            permissions,
            member_count,
        })
    }

    fn validate_input(input: &RoleInput) -> Result<(), RoleError> {
        if input.name.trim().is_empty() {
            return Err(RoleError::Validation("Role name is required".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RoleService for SeaOrmRoleService {
    async fn list_roles(&self) -> Result<Vec<RoleDto>, RoleError> {
        let rows = self.store.list_roles_with_permissions().await?;

        let mut dtos = Vec::with_capacity(rows.len());
        for (role, permissions) in rows {
            let member_count = self.store.count_users_assigned_to_role(role.id).await?;
            dtos.push(RoleDto {
                id: role.id,
                name: role.name,
                description: role.description,
                color: role.color,
                icon: role.icon,
                is_system: role.is_system,
                permissions,
                member_count,
            });
        }

        Ok(dtos)
    }

    async fn get_role(&self, id: i32) -> Result<RoleDto, RoleError> {
        let role = self.store.get_role(id).await?.ok_or(RoleError::NotFound)?;
        self.to_dto(role).await
    }

    async fn catalog(&self) -> Result<Vec<CatalogGroup>, RoleError> {
        let rows = self.store.list_permission_rows().await?;

        // BTreeMap keeps categories in stable alphabetical order.
        let mut grouped: BTreeMap<String, Vec<CatalogEntry>> = BTreeMap::new();
        for row in rows {
            grouped
                .entry(category_of(&row.name).to_string())
                .or_default()
                .push(CatalogEntry {
                    name: row.name,
                    label: row.label,
                    description: row.description,
                });
        }

        Ok(grouped
            .into_iter()
            .map(|(category, permissions)| CatalogGroup {
                category,
                permissions,
            })
            .collect())
    }

    async fn create_role(&self, input: RoleInput) -> Result<RoleDto, RoleError> {
        Self::validate_input(&input)?;

        if self.store.get_role_by_name(input.name.trim()).await?.is_some() {
            return Err(RoleError::Conflict(format!(
                "Role '{}' already exists",
                input.name.trim()
            )));
        }

        let role = self.store.create_role(input).await?;
        info!(role_id = role.id, name = %role.name, "Role created");

        let _ = self.event_bus.send(NotificationEvent::RoleMutated {
            role_id: role.id,
            name: role.name.clone(),
            action: "created".to_string(),
        });

        self.to_dto(role).await
    }

    async fn update_role(&self, id: i32, input: RoleInput) -> Result<RoleDto, RoleError> {
        Self::validate_input(&input)?;

        if let Some(other) = self.store.get_role_by_name(input.name.trim()).await?
            && other.id != id
        {
            return Err(RoleError::Conflict(format!(
                "Role '{}' already exists",
                input.name.trim()
            )));
        }

        let role = self
            .store
            .update_role(id, input)
            .await?
            .ok_or(RoleError::NotFound)?;
        info!(role_id = role.id, name = %role.name, "Role updated");

        let _ = self.event_bus.send(NotificationEvent::RoleMutated {
            role_id: role.id,
            name: role.name.clone(),
            action: "updated".to_string(),
        });

        self.to_dto(role).await
    }

    async fn delete_role(&self, id: i32) -> Result<(), RoleError> {
        let role = self.store.get_role(id).await?.ok_or(RoleError::NotFound)?;

        if role.is_system {
            return Err(RoleError::Validation(
                "System roles cannot be deleted".to_string(),
            ));
        }

        let assigned = self.store.count_users_assigned_to_role(id).await?;
        if assigned > 0 {
            return Err(RoleError::Conflict(format!(
                "Role '{}' is assigned to {assigned} user(s)",
                role.name
            )));
        }

        self.store.delete_role(id).await?;
        info!(role_id = id, name = %role.name, "Role deleted");

        let _ = self.event_bus.send(NotificationEvent::RoleMutated {
            role_id: id,
            name: role.name,
            action: "deleted".to_string(),
        });

        Ok(())
    }

    async fn assign_role(&self, user_id: i32, role_id: Option<i32>) -> Result<(), RoleError> {
        let role_name = match role_id {
            Some(rid) => {
                let role = self.store.get_role(rid).await?.ok_or(RoleError::NotFound)?;
                Some(role.name)
            }
            None => None,
        };

        self.store
            .set_user_role(user_id, role_id)
            .await?
            .ok_or(RoleError::UserNotFound)?;

        info!(user_id, role = role_name.as_deref().unwrap_or("none"), "Role assigned");

        let _ = self
            .event_bus
            .send(NotificationEvent::RoleAssigned { user_id, role_name });

        Ok(())
    }
}
