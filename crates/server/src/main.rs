//! Fasum admin server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use fasum_api::{ChangeBroadcaster, middleware::AppState, router as api_router};
use fasum_common::Config;
use fasum_core::{
    AnalyticsService, AuthService, CommentService, NotificationService, ReportService,
    TaxonomyService, UserService,
};
use fasum_db::repositories::{
    CategoryRepository, CommentRepository, FacilityTypeRepository, NotificationRepository,
    ReportRepository, SessionRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
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

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fasum=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting fasum admin server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = fasum_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    fasum_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let session_repo = SessionRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let facility_type_repo = FacilityTypeRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(user_repo);
    let auth_service = AuthService::new(
        session_repo,
        user_service.clone(),
        config.auth.session_ttl_hours,
    );
    let report_service = ReportService::new(report_repo.clone(), notification_repo.clone());
    let taxonomy_service = TaxonomyService::new(category_repo.clone(), facility_type_repo);
    let analytics_service = AnalyticsService::new(report_repo.clone(), category_repo);
    let comment_service = CommentService::new(comment_repo, report_repo);
    let notification_service = NotificationService::new(notification_repo);

    // Initialize SSE broadcaster
    let broadcaster = ChangeBroadcaster::new();

    // Create app state
    let state = AppState {
        auth_service,
        user_service,
        report_service,
        taxonomy_service,
        analytics_service,
        comment_service,
        notification_service,
        broadcaster,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            fasum_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
