mod config;
mod db;
mod error;
mod models;
mod routes;
mod services;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::services::{
    cache::ResponseCache,
    catalog::CatalogService,
    cleanup::{start_cleanup_task, CleanupConfig},
    epg::EpgService,
};
use sqlx::PgPool;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub cache: ResponseCache,
    pub catalog: CatalogService,
    pub epg: EpgService,
    pub start_time: Instant,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "telestream_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();
    let port = config.port;

    tracing::info!("Starting TeleStream Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.node_env);

    // Initialize PostgreSQL connection pool
    let pool = create_pool(&config).await?;
    tracing::info!("PostgreSQL connected");

    // Run database migrations
    run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // In-memory response cache shared by the catalog and EPG services
    let cache = ResponseCache::new();
    tracing::info!("Response cache initialized");

    // Initialize services
    let catalog = CatalogService::new(pool.clone(), cache.clone(), &config);
    let epg = EpgService::new(pool.clone(), cache.clone(), &config);

    // Start cleanup task (runs in background)
    let cleanup_config = CleanupConfig {
        interval_secs: config.cache_sweep_interval_secs,
        epg_retention_days: config.epg_retention_days,
        max_history_per_user: config.max_history_per_user,
    };
    tokio::spawn(start_cleanup_task(pool.clone(), cache.clone(), cleanup_config));
    tracing::info!("Cleanup task started");

    // Build application state
    let state = Arc::new(AppState {
        config,
        pool,
        cache,
        catalog,
        epg,
        start_time: Instant::now(),
    });

    // Build router
    let app = Router::new()
        // Health endpoints
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/ready", get(routes::health::ready))
        .route("/live", get(routes::health::live))
        // Channel catalog
        .route("/channels", get(routes::channels::list_channels))
        .route("/channels/:id", get(routes::channels::get_channel))
        .route("/channels/:id/stream", get(routes::stream::channel_stream))
        .route("/categories", get(routes::categories::list_categories))
        // VOD catalog
        .route("/vod/movies", get(routes::vod::list_movies))
        .route("/vod/movies/:id", get(routes::vod::get_movie))
        .route("/vod/movies/:id/stream", get(routes::stream::movie_stream))
        .route("/vod/series", get(routes::vod::list_series))
        .route("/vod/series/:id", get(routes::vod::get_series))
        .route("/vod/series/:id/stream", get(routes::stream::series_stream))
        // EPG
        .route("/epg", get(routes::epg::day_listing))
        .route("/epg/now", get(routes::epg::now_playing))
        .route("/epg/next", get(routes::epg::upcoming))
        // Favorites
        .route("/api/favorites", post(routes::favorites::add_favorite))
        .route(
            "/api/favorites/:user_id",
            get(routes::favorites::list_favorites),
        )
        .route(
            "/api/favorites/:user_id/:content_type/:content_id",
            delete(routes::favorites::remove_favorite),
        )
        // Watch history
        .route(
            "/api/history/sync",
            post(routes::watch_history::sync_watch_history),
        )
        .route(
            "/api/history/:user_id",
            get(routes::watch_history::get_watch_history)
                .delete(routes::watch_history::clear_watch_history),
        )
        .route(
            "/api/history/:user_id/:content_type/:content_id",
            delete(routes::watch_history::delete_history_item),
        )
        // Admin endpoints (protected by ADMIN_KEY)
        .route("/api/admin/stats", get(routes::admin::get_stats))
        .route(
            "/api/admin/cache/invalidate",
            post(routes::admin::invalidate_cache),
        )
        .route(
            "/api/admin/epg/expired",
            delete(routes::admin::delete_expired_epg),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
