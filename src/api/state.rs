//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use super::session::SessionCodec;
use crate::config::Config;
use crate::infra::Database;
use crate::services::{AccountService, AuthService, ServiceContainer, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Registration and login
    pub auth_service: Arc<dyn AuthService>,
    /// Profile lookup and updates
    pub account_service: Arc<dyn AccountService>,
    /// Session cookie signing
    pub sessions: Arc<SessionCodec>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: &Database, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), &config);
        Self::new(container.auth(), container.accounts(), config)
    }

    /// Create new application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        account_service: Arc<dyn AccountService>,
        config: Config,
    ) -> Self {
        Self {
            auth_service,
            account_service,
            sessions: Arc::new(SessionCodec::new(&config)),
            config: Arc::new(config),
        }
    }
}
