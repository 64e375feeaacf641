//! Registration, login and logout handlers.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::api::extractors::{FormErrors, Page, ValidatedForm};
use crate::api::middleware::safe_next;
use crate::api::session::{FlashCategory, Session};
use crate::api::AppState;
use crate::config::{FLASH_ACCOUNT_CREATED, FLASH_LOGIN_FAILED};
use crate::errors::{AppError, AppResult};
use crate::views::{self, LoginFields, RegisterFields};

/// Registration form
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
    #[validate(length(min = 2, max = 20, message = "Username must be between 2 and 20 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
}

/// Login form
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Checkbox; present only when ticked
    pub remember: Option<String>,
}

impl LoginForm {
    fn remember(&self) -> bool {
        self.remember.is_some()
    }
}

/// `?next=` on the login page
#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Routes only anonymous visitors may use
pub fn anonymous_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
}

pub fn logout_routes() -> Router<AppState> {
    Router::new().route("/logout", get(logout))
}

pub async fn register_page(page: Page) -> Html<String> {
    page.render(
        Some("Register"),
        &views::register_form(&RegisterFields::default(), &FormErrors::new()),
    )
}

/// Create the account and log the new user in
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    page: Page,
    ValidatedForm { form, mut errors }: ValidatedForm<RegisterForm>,
) -> AppResult<Response> {
    if errors.is_empty() {
        let result = state
            .auth_service
            .register(form.username.clone(), form.email.clone(), form.password.clone())
            .await;

        match result {
            Ok(user) => {
                session.log_in(user.id, false);
                session.flash(FlashCategory::Success, FLASH_ACCOUNT_CREATED);
                return Ok(Redirect::to("/").into_response());
            }
            Err(AppError::DuplicateUser(field)) => {
                let message = AppError::DuplicateUser(field.clone()).to_string();
                errors.add(field, message);
            }
            Err(e) => return Err(e),
        }
    }

    let fields = RegisterFields {
        username: &form.username,
        email: &form.email,
    };
    Ok(page
        .render(Some("Register"), &views::register_form(&fields, &errors))
        .into_response())
}

pub async fn login_page(page: Page, Query(query): Query<NextQuery>) -> Html<String> {
    let fields = LoginFields {
        next: safe_next(query.next.as_deref()),
        ..Default::default()
    };
    page.render(Some("Login"), &views::login_form(&fields, &FormErrors::new()))
}

/// Check credentials and redirect to `next` (local paths only) or home
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    mut page: Page,
    Query(query): Query<NextQuery>,
    ValidatedForm { form, errors }: ValidatedForm<LoginForm>,
) -> AppResult<Response> {
    let next = safe_next(query.next.as_deref());

    if errors.is_empty() {
        match state.auth_service.authenticate(&form.email, &form.password).await {
            Ok(user) => {
                session.log_in(user.id, form.remember());
                tracing::info!(user_id = %user.id, remember = form.remember(), "User logged in");
                return Ok(Redirect::to(next.unwrap_or("/")).into_response());
            }
            Err(AppError::AuthFailure) => {
                tracing::debug!("Rejected login attempt");
                page.flash_now(FlashCategory::Danger, FLASH_LOGIN_FAILED);
            }
            Err(e) => return Err(e),
        }
    }

    let fields = LoginFields {
        email: &form.email,
        remember: form.remember(),
        next,
    };
    Ok(page
        .render(Some("Login"), &views::login_form(&fields, &errors))
        .into_response())
}

pub async fn logout(session: Session) -> Redirect {
    if let Some(user_id) = session.user_id() {
        tracing::info!(%user_id, "User logged out");
    }
    session.log_out();
    Redirect::to("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_form_rules() {
        let form = RegisterForm {
            username: "a".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            confirm_password: "different".to_string(),
        };
        let errors = FormErrors::from(&form.validate().unwrap_err());
        assert!(!errors.get("username").is_empty());
        assert!(!errors.get("email").is_empty());
        assert!(!errors.get("password").is_empty());
        assert_eq!(errors.get("confirm_password"), ["Passwords must match".to_string()]);
    }

    #[test]
    fn test_register_form_accepts_valid_input() {
        let form = RegisterForm {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
            confirm_password: "password123".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_login_form_remember() {
        let mut form = LoginForm {
            email: "alice@example.com".to_string(),
            password: "x".to_string(),
            remember: None,
        };
        assert!(form.validate().is_ok());
        assert!(!form.remember());
        form.remember = Some("y".to_string());
        assert!(form.remember());
    }
}
