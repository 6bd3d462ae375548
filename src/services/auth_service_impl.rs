//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::Config;
use crate::db::Store;
use crate::services::auth_service::{AuthError, AuthService, LoginResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct SeaOrmAuthService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let is_valid = self.store.verify_user_password(username, password).await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.active {
            return Err(AuthError::Deactivated);
        }

        Ok(LoginResult {
            user_id: user.id,
            username: user.username,
            api_key: user.api_key,
            must_change_password: user.must_change_password,
        })
    }

    async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let security = self.config.read().await.security.clone();

        if new_password.len() < security.min_password_length {
            return Err(AuthError::Validation(format!(
                "New password must be at least {} characters",
                security.min_password_length
            )));
        }

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let is_valid = self
            .store
            .verify_user_password(username, current_password)
            .await?;

        if !is_valid {
            return Err(AuthError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        self.store
            .update_user_password(username, new_password, Some(&security))
            .await?;

        Ok(())
    }

    async fn get_api_key(&self, username: &str) -> Result<String, AuthError> {
        let api_key = self
            .store
            .get_user_api_key(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(api_key)
    }

    async fn regenerate_api_key(&self, username: &str) -> Result<String, AuthError> {
        let new_api_key = self.store.regenerate_user_api_key(username).await?;

        Ok(new_api_key)
    }
}
