use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod config;
mod downstream;
mod error;
mod handlers;
mod importer;
mod models;

use crate::config::Config;
use crate::downstream::DownstreamClient;
use crate::importer::SerialSource;

/// Shared application state — cheap to clone (all heap behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub downstream: DownstreamClient,
    pub serials: Arc<dyn SerialSource>,
    pub products_file: Arc<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,product_relay=debug".into()),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let downstream = DownstreamClient::new(
        &config.downstream_url,
        &config.downstream_products_path,
        config.downstream_timeout,
    )?;

    info!(
        downstream = %downstream.products_url(),
        timeout_secs = config.downstream_timeout.as_secs(),
        source = %config.products_file.display(),
        serials = ?config.serial_strategy,
        "Product relay configured"
    );

    let state = AppState {
        downstream,
        serials: config.serial_strategy.build(),
        products_file: Arc::new(config.products_file.clone()),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))

        // ── Products pass-through ───────────────────────────────────────────
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/:id",
            get(handlers::products::get_product).delete(handlers::products::delete_product),
        )

        // ── Bulk import ─────────────────────────────────────────────────────
        .route(
            "/insert-all-products",
            post(handlers::import::insert_all_products),
        )

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
