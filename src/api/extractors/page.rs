//! Page context extractor.
//!
//! Carries what every rendered page needs: the current user (for the nav
//! bar) and the session (for flash messages). Flashes are consumed only
//! when a page is actually rendered, so redirects keep them queued.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, response::Html};

use crate::api::middleware::CurrentUser;
use crate::api::session::{Flash, FlashCategory, Session};
use crate::domain::User;
use crate::errors::AppError;
use crate::views;

pub struct Page {
    pub user: Option<User>,
    session: Option<Session>,
    immediate: Vec<Flash>,
}

impl Page {
    /// Show a flash on this render instead of the next one.
    pub fn flash_now(&mut self, category: FlashCategory, message: impl Into<String>) {
        self.immediate.push(Flash::new(category, message));
    }

    /// Wrap `content` in the site layout.
    pub fn render(self, title: Option<&str>, content: &str) -> Html<String> {
        let mut flashes = self
            .session
            .as_ref()
            .map(Session::take_flashes)
            .unwrap_or_default();
        flashes.extend(self.immediate);
        Html(views::layout(title, self.user.as_ref(), &flashes, content))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Page
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Page {
            user: parts.extensions.get::<CurrentUser>().map(|c| c.0.clone()),
            session: parts.extensions.get::<Session>().cloned(),
            immediate: Vec::new(),
        })
    }
}
