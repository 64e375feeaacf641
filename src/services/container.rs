//! Service Container - Centralized service access.
//!
//! Builds every service once at startup from the database connection and
//! configuration; handlers reach them through `AppState`.

use std::sync::Arc;

use super::{AccountManager, AccountService, AuthService, Authenticator, PictureService, PictureStore};
use crate::config::Config;
use crate::infra::{UserRepository, UserStore};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get account service
    fn accounts(&self) -> Arc<dyn AccountService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    account_service: Arc<dyn AccountService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(auth_service: Arc<dyn AuthService>, account_service: Arc<dyn AccountService>) -> Self {
        Self {
            auth_service,
            account_service,
        }
    }

    /// Create service container from database connection and config.
    ///
    /// Both services share one user repository.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(UserStore::new(db));
        let pictures: Arc<dyn PictureService> =
            Arc::new(PictureStore::new(config.profile_pics_dir.clone()));

        Self::new(
            Arc::new(Authenticator::new(users.clone())),
            Arc::new(AccountManager::new(users, pictures)),
        )
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }
}
