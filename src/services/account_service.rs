//! Account service - profile lookups and updates.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::PictureService;
use crate::domain::{UpdateAccount, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Load a user for the session gate
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Apply the account form to `user`
    async fn update_account(&self, user: &User, changes: UpdateAccount) -> AppResult<User>;
}

/// Concrete implementation of AccountService.
pub struct AccountManager {
    users: Arc<dyn UserRepository>,
    pictures: Arc<dyn PictureService>,
}

impl AccountManager {
    pub fn new(users: Arc<dyn UserRepository>, pictures: Arc<dyn PictureService>) -> Self {
        Self { users, pictures }
    }

    /// Reject a changed username/email that belongs to someone else.
    async fn ensure_available(&self, user: &User, changes: &UpdateAccount) -> AppResult<()> {
        if changes.username != user.username
            && self.users.find_by_username(&changes.username).await?.is_some()
        {
            return Err(AppError::duplicate("username"));
        }
        if changes.email != user.email && self.users.find_by_email(&changes.email).await?.is_some() {
            return Err(AppError::duplicate("email"));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn update_account(&self, user: &User, changes: UpdateAccount) -> AppResult<User> {
        self.ensure_available(user, &changes).await?;

        // The previous picture is not removed
        let image_file = match changes.picture {
            Some(picture) => Some(self.pictures.ingest(picture).await?),
            None => None,
        };

        let updated = self
            .users
            .update_profile(user.id, changes.username, changes.email, image_file)
            .await?;

        tracing::info!(user_id = %updated.id, "Account updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UploadedImage;
    use crate::infra::repositories::MockUserRepository;
    use crate::services::picture_service::MockPictureService;

    fn alice() -> User {
        User::new(
            Uuid::new_v4(),
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        )
    }

    fn changes(username: &str, email: &str, picture: Option<UploadedImage>) -> UpdateAccount {
        UpdateAccount {
            username: username.to_string(),
            email: email.to_string(),
            picture,
        }
    }

    #[tokio::test]
    async fn test_unchanged_fields_skip_uniqueness_lookup() {
        let user = alice();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().never();
        repo.expect_find_by_email().never();
        repo.expect_update_profile()
            .returning(|id, username, email, image| {
                let mut u = User::new(id, username, email, "hash".into());
                if let Some(image) = image {
                    u.image_file = image;
                }
                Ok(u)
            });
        let mut pictures = MockPictureService::new();
        pictures.expect_ingest().never();

        let service = AccountManager::new(Arc::new(repo), Arc::new(pictures));
        let updated = service
            .update_account(&user, changes("alice", "alice@example.com", None))
            .await
            .unwrap();
        assert_eq!(updated.image_file, "default.jpg");
    }

    #[tokio::test]
    async fn test_changed_username_taken() {
        let user = alice();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(|_| Ok(Some(alice())));
        repo.expect_update_profile().never();
        let pictures = MockPictureService::new();

        let service = AccountManager::new(Arc::new(repo), Arc::new(pictures));
        let err = service
            .update_account(&user, changes("bob", "alice@example.com", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateUser(ref f) if f == "username"));
    }

    #[tokio::test]
    async fn test_picture_is_ingested_and_stored_on_user() {
        let user = alice();
        let mut repo = MockUserRepository::new();
        repo.expect_update_profile()
            .withf(|_, _, _, image| image.as_deref() == Some("cafe.png"))
            .returning(|id, username, email, image| {
                let mut u = User::new(id, username, email, "hash".into());
                u.image_file = image.unwrap_or_default();
                Ok(u)
            });
        let mut pictures = MockPictureService::new();
        pictures
            .expect_ingest()
            .times(1)
            .returning(|_| Ok("cafe.png".to_string()));

        let service = AccountManager::new(Arc::new(repo), Arc::new(pictures));
        let updated = service
            .update_account(
                &user,
                changes("alice", "alice@example.com", Some(UploadedImage::new(vec![1], "me.png"))),
            )
            .await
            .unwrap();
        assert_eq!(updated.image_file, "cafe.png");
    }

    #[tokio::test]
    async fn test_invalid_picture_aborts_update() {
        let user = alice();
        let mut repo = MockUserRepository::new();
        repo.expect_update_profile().never();
        let mut pictures = MockPictureService::new();
        pictures
            .expect_ingest()
            .returning(|_| Err(AppError::invalid_image("bad header")));

        let service = AccountManager::new(Arc::new(repo), Arc::new(pictures));
        let err = service
            .update_account(
                &user,
                changes("alice", "alice@example.com", Some(UploadedImage::new(vec![0], "me.png"))),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidImage(_)));
    }
}
