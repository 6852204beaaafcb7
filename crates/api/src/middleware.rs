//! API middleware.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use portfolio_core::{
    AuthService, DigestService, EngagementService, GuestbookService, ModerationService,
    ResourceService, SubscriberService,
};

/// Name of the admin session cookie.
pub const SESSION_COOKIE: &str = "admin_session";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// Resource directory.
    pub resource_service: ResourceService,
    /// Download and like tracking.
    pub engagement_service: EngagementService,
    /// Submission review.
    pub moderation_service: ModerationService,
    /// Guestbook wall.
    pub guestbook_service: GuestbookService,
    /// Newsletter subscribers.
    pub subscriber_service: SubscriberService,
    /// Weekly digest.
    pub digest_service: DigestService,
    /// Admin login and sessions.
    pub auth_service: AuthService,
    /// Whether cookies should be marked Secure.
    pub production: bool,
}

/// An expired session cookie, used to remove a dead token from the
/// client.
pub(crate) fn removal_cookie(production: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(production)
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Session middleware. Resolves the admin session cookie and attaches
/// the admin to the request; requests without a valid session pass
/// through untouched and are rejected by the extractor where needed.
/// A cookie that no longer resolves to a session is cleared on the
/// response so the client stops presenting a dead token.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let mut stale = false;

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        match state.auth_service.check(cookie.value()).await {
            Ok(Some(admin)) => {
                req.extensions_mut().insert(admin);
            }
            Ok(None) => {
                stale = true;
            }
            Err(e) => {
                tracing::warn!(error = %e, "session lookup failed");
            }
        }
    }

    let mut response = next.run(req).await;

    if stale {
        let cookie = removal_cookie(state.production);
        if let Ok(value) = header::HeaderValue::from_str(&cookie.to_string()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}
