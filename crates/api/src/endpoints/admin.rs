//! Admin endpoints. Every handler requires a live session via the
//! `AdminAuth` extractor.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post},
};
use portfolio_common::AppResult;
use portfolio_core::{
    DigestPreview, ResourceList, SendReport, SubscriberList, SubscriberStats,
};
use portfolio_db::entities::{
    guestbook_entry, resource::{self, ResourceCategory, ResourceStatus}, subscriber, weekly_email,
};
use serde::{Deserialize, Serialize};

use crate::{extractors::AdminAuth, middleware::AppState, response::ApiResponse};

/// Create the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/resources", get(list_resources))
        .route("/resources/{id}/approve", post(approve_resource))
        .route("/resources/{id}/reject", post(reject_resource))
        .route("/guestbook", get(list_guestbook))
        .route("/subscribers", get(list_subscribers))
        .route("/subscribers/stats", get(subscriber_stats))
        .route("/subscribers/export", get(export_subscribers))
        .route("/subscribers/{id}", delete(delete_subscriber).patch(set_subscriber_active))
        .route("/digest/preview", get(preview_digest))
        .route("/digest/send", post(send_digest))
        .route("/digest/history", get(digest_history))
}

/// Admin resource listing request; unlike the public listing any
/// status can be requested.
#[derive(Debug, Deserialize)]
pub struct AdminListResourcesRequest {
    pub status: Option<ResourceStatus>,
    pub category: Option<ResourceCategory>,
    pub search: Option<String>,
    #[serde(default = "crate::default_page")]
    pub page: u64,
    #[serde(default = "crate::default_page_size")]
    pub page_size: u64,
}

/// List resources in any status.
async fn list_resources(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Query(req): Query<AdminListResourcesRequest>,
) -> AppResult<ApiResponse<ResourceList>> {
    let list = state
        .resource_service
        .list(
            req.status,
            req.category,
            req.search.as_deref(),
            req.page,
            req.page_size.min(100),
        )
        .await?;

    Ok(ApiResponse::ok(list))
}

/// Approve a pending resource.
async fn approve_resource(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<resource::Model>> {
    let updated = state.moderation_service.approve(&admin, &id).await?;
    Ok(ApiResponse::ok(updated))
}

/// Reject a pending resource.
async fn reject_resource(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<resource::Model>> {
    let updated = state.moderation_service.reject(&admin, &id).await?;
    Ok(ApiResponse::ok(updated))
}

/// Pagination request.
#[derive(Debug, Deserialize)]
pub struct PageRequest {
    #[serde(default = "crate::default_page")]
    pub page: u64,
    #[serde(default = "crate::default_page_size")]
    pub page_size: u64,
}

/// Guestbook page with full rows.
#[derive(Debug, Serialize)]
pub struct AdminGuestbookPage {
    pub entries: Vec<guestbook_entry::Model>,
    pub total: u64,
}

/// Guestbook entries including client metadata.
async fn list_guestbook(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Query(req): Query<PageRequest>,
) -> AppResult<ApiResponse<AdminGuestbookPage>> {
    let (entries, total) = state
        .guestbook_service
        .admin_entries(req.page, req.page_size.min(100))
        .await?;

    Ok(ApiResponse::ok(AdminGuestbookPage { entries, total }))
}

/// Subscriber listing request.
#[derive(Debug, Deserialize)]
pub struct ListSubscribersRequest {
    pub search: Option<String>,
    #[serde(default = "crate::default_page")]
    pub page: u64,
    #[serde(default = "crate::default_page_size")]
    pub page_size: u64,
}

/// List subscribers with optional email search.
async fn list_subscribers(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Query(req): Query<ListSubscribersRequest>,
) -> AppResult<ApiResponse<SubscriberList>> {
    let list = state
        .subscriber_service
        .list(req.search.as_deref(), req.page, req.page_size.min(100))
        .await?;

    Ok(ApiResponse::ok(list))
}

/// Subscriber counts for the dashboard.
async fn subscriber_stats(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SubscriberStats>> {
    Ok(ApiResponse::ok(state.subscriber_service.stats().await?))
}

/// Download active subscribers as CSV.
async fn export_subscribers(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let csv = state.subscriber_service.export_active_csv().await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"subscribers.csv\"",
            ),
        ],
        csv,
    ))
}

/// Set subscriber active request.
#[derive(Debug, Deserialize)]
pub struct SetSubscriberActiveRequest {
    pub is_active: bool,
}

/// Toggle a subscriber's active flag.
async fn set_subscriber_active(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetSubscriberActiveRequest>,
) -> AppResult<ApiResponse<subscriber::Model>> {
    let updated = state
        .subscriber_service
        .set_active(&id, req.is_active)
        .await?;

    Ok(ApiResponse::ok(updated))
}

/// Permanently delete a subscriber.
async fn delete_subscriber(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.subscriber_service.delete(&id).await?;
    Ok(ApiResponse::ok(()))
}

/// Render the digest without sending.
async fn preview_digest(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<DigestPreview>> {
    Ok(ApiResponse::ok(state.digest_service.preview().await?))
}

/// Generate and send the weekly digest.
async fn send_digest(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SendReport>> {
    let report = state.digest_service.generate_and_send().await?;
    tracing::info!(moderator = %admin.username, record_id = %report.record.id, "digest send triggered");

    Ok(ApiResponse::ok(report))
}

/// Digest history page.
#[derive(Debug, Serialize)]
pub struct DigestHistoryPage {
    pub records: Vec<weekly_email::Model>,
    pub total: u64,
}

/// Past digest sends, most recent first.
async fn digest_history(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Query(req): Query<PageRequest>,
) -> AppResult<ApiResponse<DigestHistoryPage>> {
    let (records, total) = state
        .digest_service
        .history(req.page, req.page_size.min(100))
        .await?;

    Ok(ApiResponse::ok(DigestHistoryPage { records, total }))
}
