mod api;
mod color;
mod config;
mod error;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::color::{ColorIdentifier, ReferenceCatalog};
use crate::config::Config;

/// Shared application state
pub struct AppState {
    /// Built once at startup, read-only afterwards
    pub identifier: ColorIdentifier,
    pub config: Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "color_identifier_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();

    // Load the reference colors, the service is useless without them
    let catalog = ReferenceCatalog::load(&config.catalog_path)?;
    let identifier = ColorIdentifier::new(catalog, config.extractor);
    tracing::info!(
        "Color identifier ready: {} reference colors, max edge {}px, {} k-means runs",
        identifier.catalog().len(),
        config.extractor.max_edge,
        config.extractor.runs
    );

    // Create shared state
    let state = Arc::new(AppState {
        identifier,
        config: config.clone(),
    });

    // Build router
    let app = Router::new()
        .nest("/api", api::router())
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Color identifier listening on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
