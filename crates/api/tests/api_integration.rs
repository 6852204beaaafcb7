//! API integration tests.
//!
//! These tests drive the full router with a mock database behind the
//! services.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use portfolio_api::{middleware::AppState, router as api_router, session_middleware};
use portfolio_common::config::SiteConfig;
use portfolio_core::{
    AuthService, DigestService, EngagementService, GuestbookService, LogTransport,
    ModerationService, ResourceService, SubscriberService,
};
use portfolio_db::repositories::{
    AdminRepository, AdminSessionRepository, DownloadEventRepository, GuestbookRepository,
    ResourceLikeRepository, ResourceRepository, SubscriberRepository, WeeklyEmailRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

fn test_site() -> SiteConfig {
    SiteConfig {
        name: "BRUTAL.DEV".to_string(),
        owner: None,
        location: None,
        digest_window_days: 7,
        digest_limit: 10,
    }
}

/// Build app state over an arbitrary mock connection.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let resource_repo = ResourceRepository::new(Arc::clone(&db));
    let download_repo = DownloadEventRepository::new(Arc::clone(&db));
    let like_repo = ResourceLikeRepository::new(Arc::clone(&db));
    let guestbook_repo = GuestbookRepository::new(Arc::clone(&db));
    let subscriber_repo = SubscriberRepository::new(Arc::clone(&db));
    let weekly_email_repo = WeeklyEmailRepository::new(Arc::clone(&db));
    let admin_repo = AdminRepository::new(Arc::clone(&db));
    let session_repo = AdminSessionRepository::new(Arc::clone(&db));

    let resource_service = ResourceService::new(
        resource_repo.clone(),
        download_repo.clone(),
        like_repo.clone(),
    );
    let engagement_service =
        EngagementService::new(resource_repo.clone(), download_repo, like_repo.clone());
    let moderation_service = ModerationService::new(resource_repo.clone());
    let guestbook_service = GuestbookService::new(guestbook_repo);
    let subscriber_service = SubscriberService::new(subscriber_repo.clone());
    let digest_service = DigestService::new(
        resource_repo,
        like_repo,
        subscriber_repo,
        weekly_email_repo,
        Arc::new(LogTransport),
        test_site(),
        "https://example.com".to_string(),
    );
    let auth_service = AuthService::new(admin_repo, session_repo);

    AppState {
        resource_service,
        engagement_service,
        moderation_service,
        guestbook_service,
        subscriber_service,
        digest_service,
        auth_service,
        production: false,
    }
}

fn create_test_router(db: DatabaseConnection) -> Router {
    let state = create_test_state(db);

    api_router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .with_state(state)
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

#[tokio::test]
async fn test_admin_endpoint_without_session_returns_401() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/subscribers/stats")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_submit_resource_rejects_invalid_url() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/resources")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"name":"Pack","type":"SVG","category":"INSPIRATION",
                       "description":"Icons","download_url":"not a url","author":"Sam"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_guestbook_entries_empty_page() {
    // Entries query, the count query, then the trophy query.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<portfolio_db::entities::guestbook_entry::Model>::new()])
        .append_query_results([vec![maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(0))
        }]])
        .append_query_results([Vec::<portfolio_db::entities::guestbook_entry::Model>::new()])
        .into_connection();

    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/guestbook")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["data"]["total"], 0);
    assert_eq!(json["data"]["has_more"], false);
}

#[tokio::test]
async fn test_unsubscribe_unknown_token_reports_no_effect() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<portfolio_db::entities::subscriber::Model>::new()])
        .into_connection();

    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/newsletter/unsubscribe?token=nope")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["data"]["success"], false);
}

#[tokio::test]
async fn test_repeat_like_reports_already_liked_with_message() {
    use portfolio_db::entities::{resource, resource_like};

    let approved = resource::Model {
        id: "r1".to_string(),
        name: "Grid Kit".to_string(),
        r#type: resource::ResourceType::Figma,
        category: resource::ResourceCategory::DesignSystems,
        description: "A grid kit".to_string(),
        download_url: "https://example.com/kit".to_string(),
        author: "Ada".to_string(),
        size: None,
        date: chrono::Utc::now().into(),
        status: resource::ResourceStatus::Approved,
        created_at: chrono::Utc::now().into(),
        updated_at: None,
    };
    let existing_like = resource_like::Model {
        id: "l1".to_string(),
        resource_id: "r1".to_string(),
        ip_address: "1.2.3.4".to_string(),
        user_agent: None,
        created_at: chrono::Utc::now().into(),
    };

    // Resource lookup, the existing like, then the current count.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[approved]])
        .append_query_results([[existing_like]])
        .append_query_results([vec![maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(1))
        }]])
        .into_connection();

    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/resources/r1/like")
                .method("POST")
                .header("X-Forwarded-For", "1.2.3.4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["data"]["success"], false);
    assert!(
        json["data"]["message"]
            .as_str()
            .unwrap()
            .contains("already liked")
    );
    assert_eq!(json["data"]["likes"], 1);
}

#[tokio::test]
async fn test_stale_session_cookie_is_cleared() {
    use portfolio_db::entities::{admin_session, admin_user};

    // Token lookup finds no session.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<(admin_session::Model, admin_user::Model)>::new()])
        .into_connection();

    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/session")
                .method("GET")
                .header("Cookie", "admin_session=deadtoken")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(set_cookie.starts_with("admin_session="));
    assert!(set_cookie.contains("1970"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["data"]["authenticated"], false);
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent/endpoint")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_with_unknown_admin_returns_401() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<portfolio_db::entities::admin_user::Model>::new()])
        .into_connection();

    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/login")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"username":"ghost","password":"wrong"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
