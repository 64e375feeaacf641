//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{DEFAULT_PROFILE_IMAGE, PROFILE_PICS_URL_PREFIX};

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// File name under the profile pictures directory
    pub image_file: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the default profile picture
    pub fn new(id: Uuid, username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            password_hash,
            image_file: DEFAULT_PROFILE_IMAGE.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Public URL of the profile picture
    pub fn image_url(&self) -> String {
        format!("{}/{}", PROFILE_PICS_URL_PREFIX, self.image_file)
    }

    /// Whether the user has replaced the sentinel picture
    pub fn has_custom_image(&self) -> bool {
        self.image_file != DEFAULT_PROFILE_IMAGE
    }
}

/// Requested account changes.
///
/// Username and email are always submitted by the account form; the
/// picture is optional.
#[derive(Debug, Clone)]
pub struct UpdateAccount {
    pub username: String,
    pub email: String,
    pub picture: Option<super::UploadedImage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_has_default_image() {
        let user = User::new(
            Uuid::new_v4(),
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        );
        assert_eq!(user.image_file, "default.jpg");
        assert!(!user.has_custom_image());
        assert_eq!(user.image_url(), "/static/profile_pics/default.jpg");
    }

    #[test]
    fn test_uploaded_picture_marks_custom_image() {
        let mut user = User::new(
            Uuid::new_v4(),
            "bob".to_string(),
            "bob@example.com".to_string(),
            "hash".to_string(),
        );
        user.image_file = "3f2a9c.png".to_string();
        assert!(user.has_custom_image());
        assert_eq!(user.image_url(), "/static/profile_pics/3f2a9c.png");
    }
}
