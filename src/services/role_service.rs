//! Domain service for role mutation and the permission catalog.
//!
//! Role permission lists live in the relational join; the denormalized JSON
//! column on the role row is seed data only and is never rewritten here.

use serde::Serialize;
use thiserror::Error;

use crate::db::RoleInput;

/// Errors specific to role operations.
#[derive(Debug, Error)]
pub enum RoleError {
    #[error("Role not found")]
    NotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for RoleError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Role as reported to clients. The permission list is read back from the
/// relational join, never echoed from a request.
#[derive(Debug, Clone, Serialize)]
pub struct RoleDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_system: bool,
    pub permissions: Vec<String>,
    pub member_count: u64,
}

/// One catalog entry for the role editor.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub label: String,
    pub description: Option<String>,
}

/// Catalog entries grouped by category.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogGroup {
    pub category: String,
    pub permissions: Vec<CatalogEntry>,
}

/// Domain service trait for role management.
#[async_trait::async_trait]
pub trait RoleService: Send + Sync {
    async fn list_roles(&self) -> Result<Vec<RoleDto>, RoleError>;

    async fn get_role(&self, id: i32) -> Result<RoleDto, RoleError>;

    /// The permission catalog grouped by category, ordered for display.
    async fn catalog(&self) -> Result<Vec<CatalogGroup>, RoleError>;

    /// Creates a role. Unknown permission names are created lazily.
    ///
    /// # Errors
    ///
    /// Returns [`RoleError::Conflict`] when the name is already taken.
    async fn create_role(&self, input: RoleInput) -> Result<RoleDto, RoleError>;

    /// Replaces a role's fields and its entire permission list.
    async fn update_role(&self, id: i32, input: RoleInput) -> Result<RoleDto, RoleError>;

    /// Deletes a role.
    ///
    /// # Errors
    ///
    /// Returns [`RoleError::Validation`] for system roles and
    /// [`RoleError::Conflict`] when any user still holds the role.
    async fn delete_role(&self, id: i32) -> Result<(), RoleError>;

    /// Assigns a role to a user, or clears it with `None`.
    async fn assign_role(&self, user_id: i32, role_id: Option<i32>) -> Result<(), RoleError>;
}
