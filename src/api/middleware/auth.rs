//! Session/auth gate.
//!
//! `load_current_user` resolves the session's user for every request.
//! `require_login` and `require_anonymous` wrap route groups and turn a
//! `GateDecision` into either the handler's response or a redirect.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::api::session::{Flash, FlashCategory, Session};
use crate::api::AppState;
use crate::config::FLASH_LOGIN_REQUIRED;
use crate::domain::User;
use crate::errors::{AppError, AppResult};

/// Authenticated user, inserted into request extensions.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Outcome of a gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    Redirect {
        location: String,
        flash: Option<Flash>,
    },
}

/// Anonymous callers are sent to the login page, remembering where they
/// were going.
pub fn authenticated_only(user: Option<&CurrentUser>, uri: &Uri) -> GateDecision {
    if user.is_some() {
        return GateDecision::Pass;
    }
    GateDecision::Redirect {
        location: login_url(uri),
        flash: Some(Flash::new(FlashCategory::Info, FLASH_LOGIN_REQUIRED)),
    }
}

/// Authenticated callers have no business on register/login.
pub fn anonymous_only(user: Option<&CurrentUser>) -> GateDecision {
    match user {
        Some(_) => GateDecision::Redirect {
            location: "/".to_string(),
            flash: None,
        },
        None => GateDecision::Pass,
    }
}

/// `/login?next=<path and query>`
pub fn login_url(uri: &Uri) -> String {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("/login?next={}", encoded)
}

/// Accept `next` only when it stays on this site.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|target| {
        target.starts_with('/')
            && !target.starts_with("//")
            && !target.contains('\\')
            && !target.chars().any(char::is_control)
    })
}

/// Resolve the session's user. A session pointing at a vanished user is
/// logged out.
pub async fn load_current_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let session = request.extensions().get::<Session>().cloned();

    if let Some(session) = session {
        if let Some(user_id) = session.user_id() {
            match state.account_service.find_user(user_id).await? {
                Some(user) => {
                    request.extensions_mut().insert(CurrentUser(user));
                }
                None => {
                    tracing::warn!(%user_id, "Session refers to unknown user, logging out");
                    session.log_out();
                }
            }
        }
    }

    Ok(next.run(request).await)
}

/// Gate for authenticated-only routes.
pub async fn require_login(request: Request, next: Next) -> Response {
    let decision = authenticated_only(request.extensions().get::<CurrentUser>(), request.uri());
    let session = request.extensions().get::<Session>().cloned();
    apply(decision, session, request, next).await
}

/// Gate for anonymous-only routes.
pub async fn require_anonymous(request: Request, next: Next) -> Response {
    let decision = anonymous_only(request.extensions().get::<CurrentUser>());
    let session = request.extensions().get::<Session>().cloned();
    apply(decision, session, request, next).await
}

async fn apply(
    decision: GateDecision,
    session: Option<Session>,
    request: Request,
    next: Next,
) -> Response {
    match decision {
        GateDecision::Pass => next.run(request).await,
        GateDecision::Redirect { location, flash } => {
            if let (Some(session), Some(flash)) = (session, flash) {
                session.flash(flash.category, flash.message);
            }
            Redirect::to(&location).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn someone() -> CurrentUser {
        CurrentUser(User::new(
            Uuid::new_v4(),
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        ))
    }

    #[test]
    fn test_anonymous_sent_to_login() {
        let uri: Uri = "/account".parse().unwrap();
        let decision = authenticated_only(None, &uri);
        assert_eq!(
            decision,
            GateDecision::Redirect {
                location: "/login?next=%2Faccount".to_string(),
                flash: Some(Flash::new(FlashCategory::Info, FLASH_LOGIN_REQUIRED)),
            }
        );
    }

    #[test]
    fn test_authenticated_passes() {
        let uri: Uri = "/account".parse().unwrap();
        assert_eq!(authenticated_only(Some(&someone()), &uri), GateDecision::Pass);
    }

    #[test]
    fn test_anonymous_only() {
        assert_eq!(anonymous_only(None), GateDecision::Pass);
        assert_eq!(
            anonymous_only(Some(&someone())),
            GateDecision::Redirect {
                location: "/".to_string(),
                flash: None,
            }
        );
    }

    #[test]
    fn test_login_url_keeps_query() {
        let uri: Uri = "/account?tab=picture".parse().unwrap();
        assert_eq!(login_url(&uri), "/login?next=%2Faccount%3Ftab%3Dpicture");
    }

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/account")), Some("/account"));
        assert_eq!(safe_next(Some("/about?x=1")), Some("/about?x=1"));
        assert_eq!(safe_next(Some("https://evil.example")), None);
        assert_eq!(safe_next(Some("//evil.example")), None);
        assert_eq!(safe_next(Some("/\\evil.example")), None);
        // Browsers strip tab and newline, turning these into "//evil.example"
        assert_eq!(safe_next(Some("/\t/evil.example")), None);
        assert_eq!(safe_next(Some("/\n/evil.example")), None);
        assert_eq!(safe_next(Some("/account\r")), None);
        assert_eq!(safe_next(Some("")), None);
        assert_eq!(safe_next(None), None);
    }
}
