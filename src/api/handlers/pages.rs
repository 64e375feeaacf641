//! Public pages.

use axum::{response::Html, routing::get, Router};

use crate::api::extractors::Page;
use crate::api::AppState;
use crate::domain::post::posts;
use crate::views;

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/home", get(home))
        .route("/about", get(about))
}

pub async fn home(page: Page) -> Html<String> {
    page.render(None, &views::home(posts()))
}

pub async fn about(page: Page) -> Html<String> {
    page.render(Some("About"), &views::about())
}
