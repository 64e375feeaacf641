//! User repository backed by SeaORM.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::config::DEFAULT_PROFILE_IMAGE;
use crate::domain::User;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Writes surface unique-constraint violations as `AppError::DuplicateUser`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Insert a new user with the default profile picture
    async fn create(&self, username: String, email: String, password_hash: String) -> AppResult<User>;

    /// Overwrite username and email, and the picture when one is given
    async fn update_profile(
        &self,
        id: Uuid,
        username: String,
        email: String,
        image_file: Option<String>,
    ) -> AppResult<User>;

    /// Number of registered users
    async fn count(&self) -> AppResult<u64>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn create(&self, username: String, email: String, password_hash: String) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            image_file: Set(DEFAULT_PROFILE_IMAGE.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(map_write_error)?;
        Ok(User::from(model))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        username: String,
        email: String,
        image_file: Option<String>,
    ) -> AppResult<User> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = user.into();
        active.username = Set(username);
        active.email = Set(email);
        if let Some(image_file) = image_file {
            active.image_file = Set(image_file);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(map_write_error)?;
        Ok(User::from(model))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(UserEntity::find().count(&self.db).await?)
    }
}

/// Translate a unique-constraint violation into `DuplicateUser`, naming the
/// column when the driver message reveals it.
fn map_write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!("Unique constraint violated: {}", detail);
            AppError::duplicate(duplicate_field(&detail))
        }
        _ => AppError::from(err),
    }
}

fn duplicate_field(detail: &str) -> &'static str {
    if detail.contains("username") {
        "username"
    } else if detail.contains("email") {
        "email"
    } else {
        "username or email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Database;

    async fn store() -> UserStore {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        UserStore::new(db.get_connection())
    }

    #[test]
    fn test_duplicate_field_from_driver_message() {
        assert_eq!(duplicate_field("UNIQUE constraint failed: users.email"), "email");
        assert_eq!(duplicate_field("UNIQUE constraint failed: users.username"), "username");
        assert_eq!(
            duplicate_field("duplicate key value violates unique constraint \"users_email_key\""),
            "email"
        );
        assert_eq!(duplicate_field("something else"), "username or email");
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = store().await;
        let created = store
            .create("alice".into(), "alice@example.com".into(), "hash".into())
            .await
            .unwrap();

        assert_eq!(created.image_file, DEFAULT_PROFILE_IMAGE);
        let by_email = store.find_by_email("alice@example.com").await.unwrap().unwrap();
        let by_name = store.find_by_username("alice").await.unwrap().unwrap();
        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_id.email, "alice@example.com");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unique_email_enforced_by_database() {
        let store = store().await;
        store
            .create("alice".into(), "same@example.com".into(), "hash".into())
            .await
            .unwrap();

        let err = store
            .create("bob".into(), "same@example.com".into(), "hash".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateUser(ref f) if f == "email"));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_profile_keeps_image_when_absent() {
        let store = store().await;
        let user = store
            .create("carol".into(), "carol@example.com".into(), "hash".into())
            .await
            .unwrap();

        let updated = store
            .update_profile(user.id, "caroline".into(), "caroline@example.com".into(), None)
            .await
            .unwrap();
        assert_eq!(updated.username, "caroline");
        assert_eq!(updated.image_file, DEFAULT_PROFILE_IMAGE);

        let updated = store
            .update_profile(user.id, "caroline".into(), "caroline@example.com".into(), Some("ab.png".into()))
            .await
            .unwrap();
        assert_eq!(updated.image_file, "ab.png");
    }

    #[tokio::test]
    async fn test_update_into_taken_username() {
        let store = store().await;
        store
            .create("dave".into(), "dave@example.com".into(), "hash".into())
            .await
            .unwrap();
        let erin = store
            .create("erin".into(), "erin@example.com".into(), "hash".into())
            .await
            .unwrap();

        let err = store
            .update_profile(erin.id, "dave".into(), "erin@example.com".into(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateUser(ref f) if f == "username"));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let store = store().await;
        let err = store
            .update_profile(Uuid::new_v4(), "x".into(), "x@example.com".into(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
