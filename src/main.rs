//! brickdex server entry point.
//!
//! Starts the Axum HTTP server backed by PostgreSQL and the marketplace
//! client.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use brickdex::api;
use brickdex::app_state::AppState;
use brickdex::config::AppConfig;
use brickdex::marketplace::MarketplaceClient;
use brickdex::persistence::{CatalogStore, RetryPolicy};
use brickdex::service::{CatalogService, RefreshService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting brickdex");
    if !config.marketplace.is_configured() {
        tracing::warn!(
            "marketplace credentials not configured; price refreshes will return synthetic data"
        );
    }

    // Database pool + migrations
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database ready");

    // Build persistence + service layers
    let retry = RetryPolicy {
        max_retries: config.database_retry_max_attempts,
        base_delay: Duration::from_millis(config.database_retry_base_ms),
    };
    let store = Arc::new(CatalogStore::new(pool, retry));
    let marketplace = MarketplaceClient::new(config.marketplace.clone())?;

    let app_state = AppState {
        catalog_service: Arc::new(CatalogService::new(Arc::clone(&store))),
        refresh_service: Arc::new(RefreshService::new(store, marketplace)),
        api_secret_key: config.api_secret_key.clone(),
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
