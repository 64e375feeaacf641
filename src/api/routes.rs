//! Application route configuration.

use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::handlers::{account_routes, anonymous_routes, logout_routes, page_routes};
use super::middleware::{load_current_user, require_anonymous, require_login};
use super::session::session_middleware;
use super::AppState;
use crate::errors::AppError;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        // Public pages
        .merge(page_routes())
        .merge(logout_routes())
        // Register/login (anonymous visitors only)
        .merge(anonymous_routes().route_layer(middleware::from_fn(require_anonymous)))
        // Account (login required)
        .merge(
            account_routes(state.config.max_upload_bytes)
                .route_layer(middleware::from_fn(require_login)),
        )
        .nest_service("/static", static_files)
        .fallback(not_found)
        // Global middleware, outermost first; the session is loaded before the user
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
                .layer(middleware::from_fn_with_state(state.clone(), load_current_user)),
        )
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}
