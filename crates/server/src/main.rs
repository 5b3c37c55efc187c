//! Campus-cms server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use campus_api::AppState;
use campus_common::{Config, StorageService};
use campus_core::{
    AccountService, AdmissionService, CourseService, DashboardService, EmailService, EventService,
    ImageService, NewsService, ResourceService, ReviewService, TaggingService, TopicService,
    VisitorService,
};
use campus_db::repositories::{
    AdminRepository, AdmissionRepository, CourseRepository, EventRepository, ImageRepository,
    NewsRepository, ResourceRepository, ReviewRepository, TagRepository, TopicRepository,
    VisitorRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
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
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting campus-cms server...");

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    if config.auth.skip_auth {
        tracing::warn!("Bearer-token verification is DISABLED (auth.skip_auth)");
    }

    // Connect to database and run migrations
    let db = campus_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    campus_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let news_repo = NewsRepository::new(Arc::clone(&db));
    let event_repo = EventRepository::new(Arc::clone(&db));
    let course_repo = CourseRepository::new(Arc::clone(&db));
    let resource_repo = ResourceRepository::new(Arc::clone(&db));
    let image_repo = ImageRepository::new(Arc::clone(&db));
    let tag_repo = TagRepository::new(Arc::clone(&db));
    let topic_repo = TopicRepository::new(Arc::clone(&db));
    let review_repo = ReviewRepository::new(Arc::clone(&db));
    let admin_repo = AdminRepository::new(Arc::clone(&db));
    let visitor_repo = VisitorRepository::new(Arc::clone(&db));
    let admission_repo = AdmissionRepository::new(Arc::clone(&db));

    // Initialize services
    let storage = StorageService::new(&config.storage);
    let tagging = TaggingService::new(tag_repo);
    let email_service = EmailService::new(config.smtp.clone())?;

    let news_service = NewsService::new(
        Arc::clone(&db),
        news_repo.clone(),
        image_repo.clone(),
        tagging.clone(),
        storage.clone(),
    );
    let event_service = EventService::new(
        Arc::clone(&db),
        event_repo,
        image_repo.clone(),
        tagging,
        storage.clone(),
    );
    let course_service = CourseService::new(
        Arc::clone(&db),
        course_repo.clone(),
        resource_repo.clone(),
        image_repo.clone(),
        review_repo.clone(),
        storage.clone(),
    );
    let resource_service =
        ResourceService::new(Arc::clone(&db), resource_repo, storage.clone());
    let topic_service = TopicService::new(Arc::clone(&db), topic_repo.clone());
    let review_service = ReviewService::new(review_repo.clone(), course_repo.clone());
    let image_service = ImageService::new(Arc::clone(&db), image_repo, storage.clone());
    let admission_service = AdmissionService::new(admission_repo);
    let account_service = AccountService::new(
        admin_repo,
        email_service,
        config.auth.jwt_secret.clone(),
        config.auth.token_expiry_secs,
    );
    let dashboard_service = DashboardService::new(
        visitor_repo.clone(),
        course_repo,
        review_repo,
        topic_repo,
        news_repo,
    );
    let visitor_service = VisitorService::new(visitor_repo);

    // Create app state
    let state = AppState {
        news_service,
        event_service,
        course_service,
        resource_service,
        topic_service,
        review_service,
        image_service,
        admission_service,
        account_service,
        dashboard_service,
        visitor_service,
        storage,
        base_url: config.server.url.clone(),
        skip_auth: config.auth.skip_auth,
    };

    // Build router: API plus static serving of the upload directories
    let app = campus_api::router(state)
        .nest_service("/upload", ServeDir::new(&config.storage.upload_dir))
        .nest_service("/video", ServeDir::new(&config.storage.video_dir))
        .nest_service("/documents", ServeDir::new(&config.storage.document_dir))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shutdown complete");
    Ok(())
}
