//! pricewatch-catalog server entry point.
//!
//! Connects to the warehouse and starts the Axum HTTP server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use pricewatch_catalog::api;
use pricewatch_catalog::app_state::AppState;
use pricewatch_catalog::config::ServiceConfig;
use pricewatch_catalog::domain::TemplateLogoGenerator;
use pricewatch_catalog::persistence::PostgresProductSource;
use pricewatch_catalog::service::CatalogService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ServiceConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
    tracing::info!(addr = %config.listen_addr, mode = ?config.run_mode, "starting pricewatch-catalog");

    // Warehouse connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect_lazy(&config.database_url)
        .context("configuring warehouse connection pool")?;
    let source = PostgresProductSource::new(pool, config.catalog.products_table.clone());

    // Build service layer
    let logos = TemplateLogoGenerator::new(config.catalog.logo_base_url.clone());
    let catalog_service = Arc::new(CatalogService::new(
        config.catalog.clone(),
        Arc::new(source),
        Arc::new(logos),
    ));

    // Build application state
    let app_state = AppState {
        catalog_service,
        run_mode: config.run_mode,
    };

    // Build router
    let app = Router::new().merge(api::build_router()).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_secs,
            )))
            .layer(CorsLayer::permissive()),
    );
    let app = app.with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("ctrl-c handler unavailable; shutting down");
    }
    tracing::info!("shutdown signal received");
}
