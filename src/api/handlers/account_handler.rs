//! Account page: profile fields and picture upload.

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use validator::Validate;

use crate::api::extractors::{FormErrors, Page};
use crate::api::middleware::CurrentUser;
use crate::api::session::{FlashCategory, Session};
use crate::api::AppState;
use crate::config::{ALLOWED_PICTURE_EXTENSIONS, FLASH_ACCOUNT_UPDATED, FLASH_STORAGE_FAILED};
use crate::domain::{UpdateAccount, UploadedImage, User};
use crate::errors::{AppError, AppResult};
use crate::views::{self, AccountFields};

/// Multipart account form
#[derive(Debug, Default, Validate)]
pub struct AccountForm {
    #[validate(length(min = 2, max = 20, message = "Username must be between 2 and 20 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub picture: Option<UploadedImage>,
}

impl AccountForm {
    /// Read the form fields. An empty file input means "keep the current
    /// picture".
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = AccountForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "username" => form.username = field.text().await?,
                "email" => form.email = field.text().await?,
                "picture" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?;
                    if !filename.is_empty() && !bytes.is_empty() {
                        form.picture = Some(UploadedImage::new(bytes.to_vec(), filename));
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// Field rules plus the picture extension check.
    pub fn errors(&self) -> FormErrors {
        let mut errors = match self.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => FormErrors::from(&e),
        };
        if let Some(picture) = &self.picture {
            if !picture.has_allowed_extension() {
                errors.add(
                    "picture",
                    format!(
                        "File does not have an approved extension: {}",
                        ALLOWED_PICTURE_EXTENSIONS.join(", ")
                    ),
                );
            }
        }
        errors
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::validation(e.body_text())
}

fn too_large_message(max_upload_bytes: usize) -> String {
    format!("File is too large (maximum {} MiB)", max_upload_bytes / (1024 * 1024))
}

pub fn account_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/account", get(account_page).post(update_account))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

fn render(page: Page, user: &User, username: &str, email: &str, errors: &FormErrors) -> Html<String> {
    let image_url = user.image_url();
    let fields = AccountFields {
        username,
        email,
        image_url: &image_url,
    };
    page.render(Some("Account"), &views::account_form(&fields, errors))
}

pub async fn account_page(CurrentUser(user): CurrentUser, page: Page) -> Html<String> {
    render(page, &user, &user.username, &user.email, &FormErrors::new())
}

/// Apply the account form
pub async fn update_account(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    mut page: Page,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = match AccountForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::debug!(user_id = %user.id, "Rejected oversized account form: {}", e);
            let mut errors = FormErrors::new();
            errors.add("picture", too_large_message(state.config.max_upload_bytes));
            return Ok(render(page, &user, &user.username, &user.email, &errors).into_response());
        }
        Err(e) => return Err(multipart_error(e)),
    };
    let mut errors = form.errors();

    if errors.is_empty() {
        let changes = UpdateAccount {
            username: form.username.clone(),
            email: form.email.clone(),
            picture: form.picture,
        };

        match state.account_service.update_account(&user, changes).await {
            Ok(_) => {
                session.flash(FlashCategory::Success, FLASH_ACCOUNT_UPDATED);
                return Ok(Redirect::to("/account").into_response());
            }
            Err(AppError::DuplicateUser(field)) => {
                let message = AppError::DuplicateUser(field.clone()).to_string();
                errors.add(field, message);
            }
            Err(e @ AppError::InvalidImage(_)) => {
                tracing::debug!("Rejected picture upload: {}", e);
                errors.add("picture", e.user_message());
            }
            Err(AppError::StorageWrite(e)) => {
                tracing::error!(user_id = %user.id, "Failed to store profile picture: {}", e);
                page.flash_now(FlashCategory::Danger, FLASH_STORAGE_FAILED);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(render(page, &user, &form.username, &form.email, &errors).into_response())
}
