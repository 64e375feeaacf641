//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::views;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Accounts & credentials
    #[error("That {0} is taken. Please choose a different one.")]
    DuplicateUser(String),

    #[error("Invalid email or password")]
    AuthFailure,

    #[error("Authentication required")]
    Unauthorized,

    // Input
    #[error("{0}")]
    Validation(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    // Resources
    #[error("Resource not found")]
    NotFound,

    #[error("Failed to store file")]
    StorageWrite(#[from] std::io::Error),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Session error")]
    Session(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DuplicateUser(_) => StatusCode::CONFLICT,
            AppError::AuthFailure | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) | AppError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::StorageWrite(_)
            | AppError::Database(_)
            | AppError::Session(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::InvalidImage(_) => "The uploaded file is not a valid image".to_string(),

            AppError::StorageWrite(e) => {
                tracing::error!("Storage write error: {:?}", e);
                "The file could not be saved".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Session(e) => {
                tracing::error!("Session error: {:?}", e);
                "Your session could not be saved".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = views::error_page(status, &self.user_message());
        (status, Html(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn duplicate(field: impl Into<String>) -> Self {
        AppError::DuplicateUser(field.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn invalid_image(msg: impl Into<String>) -> Self {
        AppError::InvalidImage(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
