//! Rust Blog - a small personal blog with user accounts.
//!
//! Visitors can read posts, register, log in (optionally remembered),
//! and manage a profile with an uploaded picture.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core entities (users, passwords, pictures, posts)
//! - **services**: Registration, login, account updates, picture ingestion
//! - **infra**: Database, migrations and repositories
//! - **api**: Handlers, session cookie, auth gate and routes
//! - **views**: HTML rendering
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod views;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User};
pub use errors::{AppError, AppResult};
