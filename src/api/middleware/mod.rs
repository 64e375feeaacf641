//! API middleware.

mod auth;

pub use auth::{
    anonymous_only, authenticated_only, load_current_user, login_url, require_anonymous,
    require_login, safe_next, CurrentUser, GateDecision,
};
