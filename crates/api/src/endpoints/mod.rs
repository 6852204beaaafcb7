//! API endpoints.

mod admin;
mod auth;
mod guestbook;
mod newsletter;
mod resources;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/resources", resources::router())
        .nest("/guestbook", guestbook::router())
        .nest("/newsletter", newsletter::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}
