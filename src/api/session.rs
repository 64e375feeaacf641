//! Signed cookie sessions.
//!
//! The whole session (logged-in user, "remember me" flag, pending flash
//! messages) travels in one HS256-signed cookie. A cookie that fails
//! signature or expiry checks is treated as an empty session.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::{Config, REMEMBER_ME_DAYS, SESSION_COOKIE_NAME};
use crate::errors::{AppError, AppResult};

/// Flash message category, used as a CSS class when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Info,
    Danger,
}

impl FlashCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashCategory::Success => "success",
            FlashCategory::Info => "info",
            FlashCategory::Danger => "danger",
        }
    }
}

/// One-time notification shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn new(category: FlashCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

/// Session contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    pub user_id: Option<Uuid>,
    pub remember: bool,
    pub flashes: Vec<Flash>,
}

impl SessionData {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.flashes.is_empty()
    }
}

/// Signed payload stored in the cookie.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: Option<Uuid>,
    #[serde(default)]
    remember: bool,
    #[serde(default)]
    flashes: Vec<Flash>,
    iat: i64,
    exp: i64,
}

/// Encodes and verifies session cookies.
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    session_lifetime: Duration,
}

impl SessionCodec {
    pub fn new(config: &Config) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(config.secret_key_bytes()),
            decoding: DecodingKey::from_secret(config.secret_key_bytes()),
            validation,
            session_lifetime: Duration::hours(config.session_expiration_hours),
        }
    }

    fn lifetime(&self, remember: bool) -> Duration {
        if remember {
            Duration::days(REMEMBER_ME_DAYS)
        } else {
            self.session_lifetime
        }
    }

    /// Sign session data into a cookie value.
    pub fn encode(&self, data: &SessionData) -> AppResult<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: data.user_id,
            remember: data.remember,
            flashes: data.flashes.clone(),
            iat: now.timestamp(),
            exp: (now + self.lifetime(data.remember)).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify a cookie value. Any failure yields `None`.
    pub fn decode(&self, token: &str) -> Option<SessionData> {
        match decode::<SessionClaims>(token, &self.decoding, &self.validation) {
            Ok(data) => Some(SessionData {
                user_id: data.claims.sub,
                remember: data.claims.remember,
                flashes: data.claims.flashes,
            }),
            Err(e) => {
                tracing::debug!("Discarding session cookie: {}", e);
                None
            }
        }
    }

    /// Build the `Set-Cookie` for `data`.
    ///
    /// Remembered sessions persist across browser restarts; others are
    /// browser-session cookies.
    pub fn cookie(&self, data: &SessionData) -> AppResult<Cookie<'static>> {
        let mut cookie = Cookie::build((SESSION_COOKIE_NAME, self.encode(data)?))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        if data.remember {
            cookie.set_max_age(time::Duration::days(REMEMBER_ME_DAYS));
        }
        Ok(cookie)
    }
}

#[derive(Debug, Default)]
struct SessionState {
    data: SessionData,
    dirty: bool,
}

/// Per-request session handle.
///
/// Cloned into request extensions by `session_middleware`; changes are
/// written back to the cookie after the handler runs.
#[derive(Clone, Default)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

impl Session {
    pub fn new(data: SessionData) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState { data, dirty: false })),
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.inner.lock().data.user_id
    }

    pub fn log_in(&self, user_id: Uuid, remember: bool) {
        let mut state = self.inner.lock();
        state.data.user_id = Some(user_id);
        state.data.remember = remember;
        state.dirty = true;
    }

    /// Forget the user; pending flashes survive.
    pub fn log_out(&self) {
        let mut state = self.inner.lock();
        state.data.user_id = None;
        state.data.remember = false;
        state.dirty = true;
    }

    pub fn flash(&self, category: FlashCategory, message: impl Into<String>) {
        let mut state = self.inner.lock();
        state.data.flashes.push(Flash::new(category, message));
        state.dirty = true;
    }

    /// Remove and return queued flashes.
    pub fn take_flashes(&self) -> Vec<Flash> {
        let mut state = self.inner.lock();
        if state.data.flashes.is_empty() {
            return Vec::new();
        }
        state.dirty = true;
        std::mem::take(&mut state.data.flashes)
    }

    fn mark_dirty(&self) {
        self.inner.lock().dirty = true;
    }

    /// Data to write back, if anything changed.
    fn pending(&self) -> Option<SessionData> {
        let state = self.inner.lock();
        state.dirty.then(|| state.data.clone())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::internal("Session middleware not installed"))
    }
}

/// Load the session cookie before the handler and persist changes after.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let had_cookie = jar.get(SESSION_COOKIE_NAME).is_some();
    let session = match jar.get(SESSION_COOKIE_NAME) {
        Some(cookie) => match state.sessions.decode(cookie.value()) {
            Some(data) => Session::new(data),
            None => {
                let session = Session::default();
                session.mark_dirty();
                session
            }
        },
        None => Session::default(),
    };

    request.extensions_mut().insert(session.clone());
    let response = next.run(request).await;

    match session.pending() {
        None => response,
        Some(data) if data.is_empty() => {
            if had_cookie {
                let removal = Cookie::build((SESSION_COOKIE_NAME, "")).path("/");
                (jar.remove(removal), response).into_response()
            } else {
                response
            }
        }
        Some(data) => match state.sessions.cookie(&data) {
            Ok(cookie) => (jar.add(cookie), response).into_response(),
            Err(e) => e.into_response(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(hours: i64) -> SessionCodec {
        let config = Config::builder("test-secret-key-for-testing-only-32chars")
            .session_expiration_hours(hours)
            .build()
            .unwrap();
        SessionCodec::new(&config)
    }

    #[test]
    fn test_encode_decode() {
        let codec = codec(24);
        let data = SessionData {
            user_id: Some(Uuid::new_v4()),
            remember: true,
            flashes: vec![Flash::new(FlashCategory::Success, "Welcome")],
        };

        let token = codec.encode(&data).unwrap();
        assert_eq!(codec.decode(&token), Some(data));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let codec = codec(24);
        let token = codec
            .encode(&SessionData {
                user_id: Some(Uuid::new_v4()),
                ..Default::default()
            })
            .unwrap();

        let (unsigned, signature) = token.rsplit_once('.').unwrap();
        let flipped = if signature.starts_with('A') { 'B' } else { 'A' };
        let tampered = format!("{}.{}{}", unsigned, flipped, &signature[1..]);
        assert_eq!(codec.decode(&tampered), None);
        assert_eq!(codec.decode("garbage"), None);
    }

    #[test]
    fn test_other_key_rejected() {
        let token = codec(24)
            .encode(&SessionData {
                user_id: Some(Uuid::new_v4()),
                ..Default::default()
            })
            .unwrap();

        let other = Config::builder("another-secret-key-that-is-32-chars-long")
            .build()
            .unwrap();
        assert_eq!(SessionCodec::new(&other).decode(&token), None);
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = codec(24);
        let claims = SessionClaims {
            sub: Some(Uuid::new_v4()),
            remember: false,
            flashes: vec![],
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &codec.encoding).unwrap();
        assert_eq!(codec.decode(&token), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let codec = codec(24);
        let session_cookie = codec
            .cookie(&SessionData {
                user_id: Some(Uuid::new_v4()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(session_cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(session_cookie.http_only(), Some(true));
        assert_eq!(session_cookie.max_age(), None);

        let remembered = codec
            .cookie(&SessionData {
                user_id: Some(Uuid::new_v4()),
                remember: true,
                flashes: vec![],
            })
            .unwrap();
        assert_eq!(remembered.max_age(), Some(time::Duration::days(REMEMBER_ME_DAYS)));
    }

    #[test]
    fn test_session_handle_tracks_changes() {
        let session = Session::new(SessionData::default());
        assert!(session.pending().is_none());
        assert!(session.take_flashes().is_empty());
        assert!(session.pending().is_none());

        let id = Uuid::new_v4();
        session.log_in(id, false);
        session.flash(FlashCategory::Info, "hello");
        let pending = session.pending().unwrap();
        assert_eq!(pending.user_id, Some(id));
        assert_eq!(pending.flashes.len(), 1);

        assert_eq!(session.take_flashes().len(), 1);
        assert!(session.take_flashes().is_empty());

        session.flash(FlashCategory::Success, "bye");
        session.log_out();
        let pending = session.pending().unwrap();
        assert_eq!(pending.user_id, None);
        assert_eq!(pending.flashes.len(), 1);
    }
}
