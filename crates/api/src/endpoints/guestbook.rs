//! Guestbook endpoints.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use portfolio_common::AppResult;
use portfolio_core::{GuestbookPage, SignGuestbookInput, TrophyEntry};
use serde::Deserialize;

use crate::{extractors::ClientInfo, middleware::AppState, response::ApiResponse};

/// Create the guestbook router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(entries).post(sign))
        .route("/trophies", get(trophies))
}

/// List entries request.
#[derive(Debug, Deserialize)]
pub struct ListEntriesRequest {
    #[serde(default = "crate::default_page")]
    pub page: u64,
    #[serde(default = "crate::default_page_size")]
    pub page_size: u64,
}

/// Public entries, newest first, client metadata stripped.
async fn entries(
    State(state): State<AppState>,
    Query(req): Query<ListEntriesRequest>,
) -> AppResult<ApiResponse<GuestbookPage>> {
    let page = state
        .guestbook_service
        .entries(req.page, req.page_size.min(100))
        .await?;

    Ok(ApiResponse::ok(page))
}

/// Sign the guestbook.
async fn sign(
    State(state): State<AppState>,
    client: ClientInfo,
    Json(req): Json<SignGuestbookInput>,
) -> AppResult<ApiResponse<portfolio_core::PublicEntry>> {
    let entry = state
        .guestbook_service
        .sign(req, client.ip.as_deref(), client.user_agent.as_deref())
        .await?;

    Ok(ApiResponse::ok(entry))
}

/// The three oldest signatures, crowned gold, silver and bronze.
async fn trophies(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<TrophyEntry>>> {
    let trophies = state.guestbook_service.trophy_entries().await?;
    Ok(ApiResponse::ok(trophies))
}
