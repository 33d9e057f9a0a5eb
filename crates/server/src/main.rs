//! Prediction Server - Disease classification over HTTP
//!
//! Loads the serialized classifiers at startup (training the autism model
//! once when its artifact is absent) and serves predictions for the four
//! supported categories.

use anyhow::Result;
use predictor_lib::{Category, ModelRegistry, ModelStore, ServerMetrics};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting prediction-server");

    // Load configuration
    let config = config::ServerConfig::load()?;
    info!(
        models_dir = %config.models_dir.display(),
        dataset = %config.dataset_path.display(),
        "Server configured"
    );

    // Load models, training the autism fallback if its artifact is absent.
    // This completes before the listener binds; a failed load or fit only
    // leaves that category unavailable.
    let store = ModelStore::new(&config.models_dir);
    let registry = ModelRegistry::initialize(&store, &config.dataset_path);

    // Initialize metrics and expose startup availability
    let metrics = ServerMetrics::new();
    for category in Category::ALL {
        metrics.set_model_loaded(category.route_name(), registry.is_available(category));
    }

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(registry, metrics));

    // Start the API server
    let api_handle = tokio::spawn(api::serve(config.port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    api_handle.abort();

    Ok(())
}
