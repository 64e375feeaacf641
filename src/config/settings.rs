//! Application settings loaded from environment variables.

use std::env;
use std::path::PathBuf;

use rand::RngCore;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PROFILE_PICS_DIR,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SESSION_EXPIRATION_HOURS,
    DEFAULT_STATIC_DIR, GENERATED_SECRET_KEY_BYTES, MIN_SECRET_KEY_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    secret_key: String,
    pub session_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub static_dir: PathBuf,
    pub profile_pics_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("session_expiration_hours", &self.session_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("static_dir", &self.static_dir)
            .field("profile_pics_dir", &self.profile_pics_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl Config {
    /// Load configuration from `.env` and environment variables.
    ///
    /// # Errors
    /// Returns a validation error if `SECRET_KEY` is set but too short.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let secret_key = match env::var("SECRET_KEY") {
            Ok(key) => key,
            Err(_) => {
                tracing::warn!("SECRET_KEY not set, generating a random key; sessions will not survive a restart");
                generate_secret_key()
            }
        };

        Self::builder(secret_key)
            .database_url(env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()))
            .session_expiration_hours(parse_env("SESSION_EXPIRATION_HOURS", DEFAULT_SESSION_EXPIRATION_HOURS))
            .server(
                env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                parse_env("SERVER_PORT", DEFAULT_SERVER_PORT),
            )
            .static_dir(env::var("STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string()))
            .profile_pics_dir(
                env::var("PROFILE_PICS_DIR").unwrap_or_else(|_| DEFAULT_PROFILE_PICS_DIR.to_string()),
            )
            .max_upload_bytes(parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES))
            .build()
    }

    /// Start a configuration with defaults for everything but the secret key.
    pub fn builder(secret_key: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder {
            config: Self {
                database_url: DEFAULT_DATABASE_URL.to_string(),
                secret_key: secret_key.into(),
                session_expiration_hours: DEFAULT_SESSION_EXPIRATION_HOURS,
                server_host: DEFAULT_SERVER_HOST.to_string(),
                server_port: DEFAULT_SERVER_PORT,
                static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
                profile_pics_dir: PathBuf::from(DEFAULT_PROFILE_PICS_DIR),
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
        }
    }

    /// Get secret key bytes for session signing/verification.
    pub fn secret_key_bytes(&self) -> &[u8] {
        self.secret_key.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Builder used by `from_env` and by tests.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = url.into();
        self
    }

    pub fn session_expiration_hours(mut self, hours: i64) -> Self {
        self.config.session_expiration_hours = hours;
        self
    }

    pub fn server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.config.server_host = host.into();
        self.config.server_port = port;
        self
    }

    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.static_dir = dir.into();
        self
    }

    pub fn profile_pics_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.profile_pics_dir = dir.into();
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> AppResult<Config> {
        if self.config.secret_key.len() < MIN_SECRET_KEY_LENGTH {
            return Err(AppError::validation(format!(
                "SECRET_KEY must be at least {} characters long",
                MIN_SECRET_KEY_LENGTH
            )));
        }
        if self.config.session_expiration_hours <= 0 {
            return Err(AppError::validation(
                "SESSION_EXPIRATION_HOURS must be positive",
            ));
        }
        Ok(self.config)
    }
}

/// Read and parse an environment variable, falling back to `default`.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Random hex key, used when the operator did not configure one.
fn generate_secret_key() -> String {
    let mut bytes = [0u8; GENERATED_SECRET_KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
