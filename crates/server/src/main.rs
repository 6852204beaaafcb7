//! Portfolio backend entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use portfolio_api::{AppState, router as api_router, session_middleware};
use portfolio_common::Config;
use portfolio_core::{
    AuthService, DigestService, EngagementService, GuestbookService, LogTransport,
    ModerationService, ResourceService, SubscriberService,
};
use portfolio_db::repositories::{
    AdminRepository, AdminSessionRepository, DownloadEventRepository, GuestbookRepository,
    ResourceLikeRepository, ResourceRepository, SubscriberRepository, WeeklyEmailRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting portfolio backend...");

    let config = Config::load()?;

    let db = Arc::new(portfolio_db::init(&config).await?);
    info!("Connected to database");

    info!("Running database migrations...");
    portfolio_db::migrate(db.as_ref()).await?;
    info!("Migrations completed");

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

    // No email provider wired in yet; digests are logged, not delivered.
    let mailer = Arc::new(LogTransport);
    let digest_service = DigestService::new(
        resource_repo,
        like_repo,
        subscriber_repo,
        weekly_email_repo,
        mailer,
        config.site.clone(),
        config.server.url.clone(),
    );

    let auth_service = AuthService::new(admin_repo, session_repo);

    let state = AppState {
        resource_service,
        engagement_service,
        moderation_service,
        guestbook_service,
        subscriber_service,
        digest_service,
        auth_service,
        production: config.server.production,
    };

    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
