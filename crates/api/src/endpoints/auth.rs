//! Admin auth endpoints.

use axum::{Json, Router, extract::State, routing::{get, post}};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use portfolio_common::{AppError, AppResult};
use portfolio_core::LoginInput;
use serde::Serialize;

use crate::{
    extractors::MaybeAdmin,
    middleware::{AppState, SESSION_COOKIE},
    response::ApiResponse,
};

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/session", get(session))
        .route("/logout", post(logout))
}

/// Session state response.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

fn session_cookie(state: &AppState, token: String, expires_at: i64) -> AppResult<Cookie<'static>> {
    let expires = time::OffsetDateTime::from_unix_timestamp(expires_at)
        .map_err(|e| AppError::Internal(format!("Invalid session expiry: {e}")))?;

    Ok(Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(state.production)
        .expires(expires)
        .build())
}

/// Log in and set the session cookie.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginInput>,
) -> AppResult<(CookieJar, ApiResponse<SessionResponse>)> {
    let username = req.username.trim().to_string();
    let session = state.auth_service.login(req).await?;
    let cookie = session_cookie(&state, session.session_token, session.expires_at.timestamp())?;

    Ok((
        jar.add(cookie),
        ApiResponse::ok(SessionResponse {
            authenticated: true,
            username: Some(username),
        }),
    ))
}

/// Report whether the caller has a live admin session. Stale cookies
/// are cleared by the session middleware, which sees every request.
async fn session(
    MaybeAdmin(admin): MaybeAdmin,
) -> AppResult<ApiResponse<SessionResponse>> {
    Ok(ApiResponse::ok(match admin {
        Some(admin) => SessionResponse {
            authenticated: true,
            username: Some(admin.username),
        },
        None => SessionResponse {
            authenticated: false,
            username: None,
        },
    }))
}

/// Log out, clearing the session cookie. Idempotent.
async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, ApiResponse<SessionResponse>)> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.auth_service.logout(cookie.value()).await?;
    }

    Ok((
        jar.add(crate::middleware::removal_cookie(state.production)),
        ApiResponse::ok(SessionResponse {
            authenticated: false,
            username: None,
        }),
    ))
}
