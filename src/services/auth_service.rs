//! Authentication service - registration and credential checks.
//!
//! Password hashing lives in the domain `Password` value object; this
//! service only decides who may register and who may log in.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, username: String, email: String, password: String) -> AppResult<User>;

    /// Check an email/password pair
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, username: String, email: String, password: String) -> AppResult<User> {
        // Friendly pre-check; the unique indexes still decide concurrent races
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AppError::duplicate("username"));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::duplicate("email"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self.users.create(username, email, password_hash).await?;

        tracing::info!(user_id = %user.id, "Registered new user");
        Ok(user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let Some(user) = self.users.find_by_email(email).await? else {
            Password::verify_dummy(password);
            return Err(AppError::AuthFailure);
        };

        if !Password::from_hash(user.password_hash.clone()).verify(password) {
            return Err(AppError::AuthFailure);
        }

        Ok(user)
    }
}
