//! HTTP API layer for the portfolio backend.
//!
//! - **Endpoints**: public directory, guestbook, newsletter, admin
//! - **Extractors**: admin session, client address metadata
//! - **Middleware**: session cookie resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, session_middleware};

pub(crate) const fn default_page() -> u64 {
    1
}

pub(crate) const fn default_page_size() -> u64 {
    20
}
