//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 5000;

// =============================================================================
// Database
// =============================================================================

/// Default database connection URL (SQLite file next to the binary)
pub const DEFAULT_DATABASE_URL: &str = "sqlite://site.db?mode=rwc";

// =============================================================================
// Sessions
// =============================================================================

/// Name of the signed session cookie
pub const SESSION_COOKIE_NAME: &str = "session";

/// Default lifetime of a non-remembered session, in hours
pub const DEFAULT_SESSION_EXPIRATION_HOURS: i64 = 24;

/// Lifetime of a "remember me" session, in days
pub const REMEMBER_ME_DAYS: i64 = 365;

/// Minimum secret key length when supplied by the operator
pub const MIN_SECRET_KEY_LENGTH: usize = 32;

/// Random bytes used for a generated secret key (hex doubles the length)
pub const GENERATED_SECRET_KEY_BYTES: usize = 16;

// =============================================================================
// Static files & profile pictures
// =============================================================================

/// Directory served under `/static`
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Directory holding uploaded profile pictures
pub const DEFAULT_PROFILE_PICS_DIR: &str = "static/profile_pics";

/// URL prefix for profile pictures
pub const PROFILE_PICS_URL_PREFIX: &str = "/static/profile_pics";

/// Sentinel image used until a user uploads a picture
pub const DEFAULT_PROFILE_IMAGE: &str = "default.jpg";

/// Thumbnail bound for profile pictures, in pixels
pub const PROFILE_PICTURE_MAX_DIMENSION: u32 = 125;

/// Random bytes in a stored picture's filename token
pub const PICTURE_TOKEN_BYTES: usize = 16;

/// Accepted picture extensions (compared case-insensitively)
pub const ALLOWED_PICTURE_EXTENSIONS: &[&str] = &["jpg", "png"];

/// Default request body cap for uploads (5 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 8;

// =============================================================================
// Flash messages
// =============================================================================

pub const FLASH_LOGIN_REQUIRED: &str = "Please log in to access this page.";
pub const FLASH_LOGIN_FAILED: &str = "Login unsuccessful. Please check email and password";
pub const FLASH_ACCOUNT_CREATED: &str = "Your account has been created! You are now logged in.";
pub const FLASH_ACCOUNT_UPDATED: &str = "Your account has been updated";
pub const FLASH_STORAGE_FAILED: &str = "Your picture could not be saved. Please try again later.";
