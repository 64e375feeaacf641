//! Domain layer - Core business entities and logic
//!
//! Entities and value objects independent of HTTP and the database.

pub mod password;
pub mod picture;
pub mod post;
pub mod user;

pub use password::Password;
pub use picture::UploadedImage;
pub use post::Post;
pub use user::{UpdateAccount, User};
