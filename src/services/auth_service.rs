//! Domain service for authentication and credential management.
//!
//! Handles login, password changes, and API key management.

use serde::Serialize;
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Account is deactivated")]
    Deactivated,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Login result containing what the client needs to store credentials and
/// decide whether to force a password change.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub user_id: i32,
    pub username: String,
    pub api_key: String,
    pub must_change_password: bool,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns login data.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails and
    /// [`AuthError::Deactivated`] for inactive accounts.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Changes a user's password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if the current password is incorrect
    /// or the new one fails the policy.
    async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    /// Gets the current API key for a user.
    async fn get_api_key(&self, username: &str) -> Result<String, AuthError>;

    /// Regenerates the API key for a user and returns the new one.
    async fn regenerate_api_key(&self, username: &str) -> Result<String, AuthError>;
}
