//! Resource directory endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use portfolio_common::AppResult;
use portfolio_core::{LikeOutcome, ResourceList, SubmitResourceInput};
use portfolio_db::entities::resource::{self, ResourceCategory};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::ClientInfo,
    middleware::AppState,
    response::{ActionResponse, ApiResponse},
};

/// Create the resources router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(submit))
        .route("/{id}", get(show))
        .route("/{id}/download", post(download))
        .route("/{id}/like", get(like_status).post(like))
}

/// List resources request.
#[derive(Debug, Deserialize)]
pub struct ListResourcesRequest {
    pub category: Option<ResourceCategory>,
    pub search: Option<String>,
    #[serde(default = "crate::default_page")]
    pub page: u64,
    #[serde(default = "crate::default_page_size")]
    pub page_size: u64,
}

/// List approved resources.
async fn list(
    State(state): State<AppState>,
    Query(req): Query<ListResourcesRequest>,
) -> AppResult<ApiResponse<ResourceList>> {
    let list = state
        .resource_service
        .list_public(
            req.category,
            req.search.as_deref(),
            req.page,
            req.page_size.min(100),
        )
        .await?;

    Ok(ApiResponse::ok(list))
}

/// Submit a resource for review.
async fn submit(
    State(state): State<AppState>,
    Json(req): Json<SubmitResourceInput>,
) -> AppResult<ApiResponse<resource::Model>> {
    let created = state.resource_service.submit(req).await?;
    Ok(ApiResponse::ok(created))
}

/// Fetch a single resource.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<resource::Model>> {
    let resource = state.resource_service.get(&id).await?;
    Ok(ApiResponse::ok(resource))
}

/// Download response carrying the new total.
#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub downloads: u64,
}

/// Record a download. Never fails the download for tracking reasons.
async fn download(
    State(state): State<AppState>,
    Path(id): Path<String>,
    client: ClientInfo,
) -> ApiResponse<DownloadResponse> {
    let downloads = state
        .engagement_service
        .record_download(&id, client.ip.as_deref(), client.user_agent.as_deref())
        .await;

    ApiResponse::ok(DownloadResponse { downloads })
}

/// Outcome of a like attempt: the shared action body plus the current
/// like total, so repeat likes render through the same notification
/// path as other informational outcomes.
#[derive(Debug, Serialize)]
pub struct LikeActionResponse {
    #[serde(flatten)]
    pub action: ActionResponse,
    pub likes: u64,
}

/// Like a resource. One like per client address.
async fn like(
    State(state): State<AppState>,
    Path(id): Path<String>,
    client: ClientInfo,
) -> AppResult<ApiResponse<LikeActionResponse>> {
    let ip = client.ip.unwrap_or_else(|| "unknown".to_string());

    let outcome = state
        .engagement_service
        .like(&id, &ip, client.user_agent.as_deref())
        .await?;

    let (action, likes) = match outcome {
        LikeOutcome::Liked(likes) => (ActionResponse::ok("Thanks for the like!"), likes),
        LikeOutcome::AlreadyLiked => (
            ActionResponse::no_effect("You have already liked this resource."),
            state.engagement_service.like_count(&id).await?,
        ),
    };

    Ok(ApiResponse::ok(LikeActionResponse { action, likes }))
}

/// Like status for the calling address.
#[derive(Debug, Serialize)]
pub struct LikeStatusResponse {
    pub liked: bool,
    pub likes: u64,
}

/// Whether the calling address has liked this resource.
async fn like_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    client: ClientInfo,
) -> AppResult<ApiResponse<LikeStatusResponse>> {
    let ip = client.ip.unwrap_or_else(|| "unknown".to_string());

    let liked = state.engagement_service.has_liked(&id, &ip).await?;
    let likes = state.engagement_service.like_count(&id).await?;

    Ok(ApiResponse::ok(LikeStatusResponse { liked, likes }))
}
