use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::users;

/// User data returned from the repository (without the password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub api_key: String,
    pub first_name: String,
    pub last_name: String,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub hire_date: Option<String>,
    pub manager_id: Option<i32>,
    pub legacy_role: Option<String>,
    pub role_id: Option<i32>,
    pub active: bool,
    pub must_change_password: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            api_key: model.api_key,
            first_name: model.first_name,
            last_name: model.last_name,
            department: model.department,
            job_title: model.job_title,
            hire_date: model.hire_date,
            manager_id: model.manager_id,
            legacy_role: model.legacy_role,
            role_id: model.role_id,
            active: model.active,
            must_change_password: model.must_change_password,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Fields for a new directory account. The password is hashed before it
/// reaches the repository.
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub hire_date: Option<String>,
    pub manager_id: Option<i32>,
    pub legacy_role: Option<String>,
    pub role_id: Option<i32>,
}

/// Full-profile update; PUT semantics, every field lands as given.
pub struct UserProfileUpdate {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub hire_date: Option<String>,
    pub manager_id: Option<i32>,
    pub legacy_role: Option<String>,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Get user by e-mail
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(User::from))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// Directory listing, alphabetical, with optional filters.
    pub async fn list(
        &self,
        department: Option<&str>,
        include_inactive: bool,
    ) -> Result<Vec<User>> {
        let mut query = users::Entity::find()
            .order_by_asc(users::Column::LastName)
            .order_by_asc(users::Column::FirstName);

        if let Some(department) = department {
            query = query.filter(users::Column::Department.eq(department));
        }
        if !include_inactive {
            query = query.filter(users::Column::Active.eq(true));
        }

        let rows = query
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Every active account, used for announcement fan-out.
    pub async fn list_active_ids(&self) -> Result<Vec<i32>> {
        let rows = users::Entity::find()
            .filter(users::Column::Active.eq(true))
            .all(&self.conn)
            .await
            .context("Failed to list active users")?;

        Ok(rows.into_iter().map(|u| u.id).collect())
    }

    pub async fn count_active(&self) -> Result<u64> {
        let count = users::Entity::find()
            .filter(users::Column::Active.eq(true))
            .count(&self.conn)
            .await
            .context("Failed to count active users")?;

        Ok(count)
    }

    pub async fn count_assigned_to_role(&self, role_id: i32) -> Result<u64> {
        let count = users::Entity::find()
            .filter(users::Column::RoleId.eq(role_id))
            .count(&self.conn)
            .await
            .context("Failed to count users assigned to role")?;

        Ok(count)
    }

    pub async fn create(&self, new: NewUser) -> Result<User> {
        let now = chrono::Utc::now().to_rfc3339();
        let api_key = generate_api_key();

        let inserted = users::Entity::insert(users::ActiveModel {
            username: Set(new.username),
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            api_key: Set(api_key),
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            department: Set(new.department),
            job_title: Set(new.job_title),
            hire_date: Set(new.hire_date),
            manager_id: Set(new.manager_id),
            legacy_role: Set(new.legacy_role),
            role_id: Set(new.role_id),
            active: Set(true),
            must_change_password: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await
        .context("Failed to insert user")?;

        let model = users::Entity::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created user"))?;

        Ok(User::from(model))
    }

    pub async fn update_profile(
        &self,
        id: i32,
        update: UserProfileUpdate,
    ) -> Result<Option<User>> {
        let Some(user) = users::Entity::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.email = Set(update.email);
        active.first_name = Set(update.first_name);
        active.last_name = Set(update.last_name);
        active.department = Set(update.department);
        active.job_title = Set(update.job_title);
        active.hire_date = Set(update.hire_date);
        active.manager_id = Set(update.manager_id);
        active.legacy_role = Set(update.legacy_role);
        active.updated_at = Set(now);
        let model = active.update(&self.conn).await?;

        Ok(Some(User::from(model)))
    }

    pub async fn set_active(&self, id: i32, active: bool) -> Result<Option<User>> {
        let Some(user) = users::Entity::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut model: users::ActiveModel = user.into();
        model.active = Set(active);
        model.updated_at = Set(now);
        let updated = model.update(&self.conn).await?;

        Ok(Some(User::from(updated)))
    }

    /// Attach or clear the relational role on a user.
    pub async fn set_role(&self, id: i32, role_id: Option<i32>) -> Result<Option<User>> {
        let Some(user) = users::Entity::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut model: users::ActiveModel = user.into();
        model.role_id = Set(role_id);
        model.updated_at = Set(now);
        let updated = model.update(&self.conn).await?;

        Ok(Some(User::from(updated)))
    }

    /// Verify password for a user
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_password(&self, username: &str, password: &str) -> Result<bool> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(false);
        };

        let password_hash = user.password_hash;
        let password = password.to_string();

        // Run CPU-intensive password verification in a blocking task
        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid)
    }

    /// Update password for a user (hashes the new password) and clear the
    /// rotation flag.
    pub async fn update_password(
        &self,
        username: &str,
        new_password: &str,
        config: Option<&SecurityConfig>,
    ) -> Result<()> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {username}"))?;

        let password = new_password.to_string();
        let config = config.cloned();
        let new_hash = task::spawn_blocking(move || hash_password(&password, config.as_ref()))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.must_change_password = Set(false);
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Verify API key and return the associated user
    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::ApiKey.eq(api_key))
            .one(&self.conn)
            .await
            .context("Failed to query user by API key")?;

        Ok(user.map(User::from))
    }

    /// Get API key for a user
    pub async fn get_api_key(&self, username: &str) -> Result<Option<String>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for API key")?;

        Ok(user.map(|u| u.api_key))
    }

    /// Regenerate API key for a user
    pub async fn regenerate_api_key(&self, username: &str) -> Result<String> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for API key regeneration")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {username}"))?;

        let new_api_key = generate_api_key();
        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.api_key = Set(new_api_key.clone());
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(new_api_key)
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses default (high memory) params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None, // output length (use default)
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Generate a random API key (64 character hex string)
#[must_use]
pub fn generate_api_key() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
