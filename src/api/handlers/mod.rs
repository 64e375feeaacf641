//! HTTP request handlers.

pub mod account_handler;
pub mod auth_handler;
pub mod pages;

pub use account_handler::account_routes;
pub use auth_handler::{anonymous_routes, logout_routes};
pub use pages::page_routes;
