//! Biblos - library catalog server

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblos_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::{sessions::SessionsService, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("biblos_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Biblos Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Initialize the Redis-backed session store
    let sessions = SessionsService::new(&config.redis.url, config.sessions.ttl_seconds)
        .await
        .expect("Failed to connect to Redis");

    tracing::info!("Connected to Redis");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone(), sessions);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Catalog home
        .route("/", get(api::index::index))
        // Authentication
        .route("/auth/login", get(api::auth::login_form))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Books
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/:id", get(api::books::get_book))
        .route("/books/:id", put(api::books::update_book))
        .route("/books/:id/delete", get(api::books::confirm_delete_book))
        .route("/books/:id/delete", post(api::books::delete_book))
        .route("/books/:id/copies", get(api::books::list_copies))
        .route("/books/:id/copies", post(api::books::create_copy))
        // Authors
        .route("/authors", get(api::authors::list_authors))
        .route("/authors", post(api::authors::create_author))
        .route("/authors/:id", get(api::authors::get_author))
        .route("/authors/:id", put(api::authors::update_author))
        .route("/authors/:id/delete", get(api::authors::confirm_delete_author))
        .route("/authors/:id/delete", post(api::authors::delete_author))
        // Genres
        .route("/genres", get(api::genres::list_genres))
        .route("/genres", post(api::genres::create_genre))
        .route("/genres/:id", get(api::genres::get_genre))
        // Languages
        .route("/languages", get(api::languages::list_languages))
        .route("/languages", post(api::languages::create_language))
        .route("/languages/:id", get(api::languages::get_language))
        .route("/languages/:id", delete(api::languages::delete_language))
        // Copies and loans
        .route("/copies/:id", get(api::loans::get_copy))
        .route("/copies/:id/loan", post(api::loans::loan_copy))
        .route("/copies/:id/renew", get(api::loans::renewal_form))
        .route("/copies/:id/renew", post(api::loans::renew_loan))
        .route("/copies/:id/return", post(api::loans::return_copy))
        .route("/loans/mine", get(api::loans::my_borrowed))
        .route("/loans/borrowed", get(api::loans::all_borrowed))
        // Users
        .route("/users", post(api::users::create_user))
        .route("/users/:id", get(api::users::get_user))
        .route("/users/:id", delete(api::users::delete_user))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
