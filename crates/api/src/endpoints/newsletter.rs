//! Newsletter endpoints.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use portfolio_common::AppResult;
use portfolio_core::{SubscribeInput, SubscribeOutcome};
use serde::Deserialize;

use crate::{
    middleware::AppState,
    response::{ActionResponse, ApiResponse},
};

/// Create the newsletter router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subscribe", post(subscribe))
        .route("/unsubscribe", get(unsubscribe).post(unsubscribe))
}

/// Subscribe to the newsletter.
async fn subscribe(
    State(state): State<AppState>,
    Json(req): Json<SubscribeInput>,
) -> AppResult<ApiResponse<ActionResponse>> {
    let outcome = state.subscriber_service.subscribe(req).await?;

    let response = match outcome {
        SubscribeOutcome::Subscribed(_) => ActionResponse::ok("Subscribed! Welcome aboard."),
        SubscribeOutcome::Reactivated(_) => ActionResponse::ok("Welcome back! Subscription reactivated."),
        SubscribeOutcome::AlreadySubscribed => {
            ActionResponse::no_effect("This address is already subscribed.")
        }
    };

    Ok(ApiResponse::ok(response))
}

/// Unsubscribe request.
#[derive(Debug, Deserialize)]
pub struct UnsubscribeRequest {
    pub token: String,
}

/// Unsubscribe via emailed token link. Unknown tokens are reported,
/// repeat unsubscribes succeed quietly.
async fn unsubscribe(
    State(state): State<AppState>,
    Query(req): Query<UnsubscribeRequest>,
) -> AppResult<ApiResponse<ActionResponse>> {
    let response = if state.subscriber_service.unsubscribe(&req.token).await? {
        ActionResponse::ok("You have been unsubscribed.")
    } else {
        ActionResponse::no_effect("Unknown unsubscribe link.")
    };

    Ok(ApiResponse::ok(response))
}
