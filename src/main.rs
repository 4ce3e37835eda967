mod adapters;
mod application;
mod domain;
mod services;

use std::sync::Arc;

use adapters::{
    controllers::{health_controller::HealthController, transfer_controller::TransferController},
    middleware::validate_relay_secret,
    state::AppState,
};
use application::pipeline::{BatchProcessor, BufferPool, ProcessMemoryProbe};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::config::{Secrets, TransferConfig};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

async fn hello_world() -> &'static str {
    "attachment-relay is running"
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let transfer_config = Arc::new(
        TransferConfig::from_env().expect("ERROR: Invalid RELAY_* transfer configuration"),
    );
    let secrets = Secrets::from_env().expect("ERROR: Missing platform credentials");

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .expect("PORT must be a valid u16");

    tracing::info!(
        max_file_size = transfer_config.max_file_size,
        max_files = transfer_config.max_files,
        retry_attempts = transfer_config.retry_attempts,
        buffer_pool_size = transfer_config.buffer_pool_size,
        "Starting attachment-relay"
    );

    // Configure CORS
    let cors = if let Ok(allowed_origins) = std::env::var("CORS_ALLOWED_ORIGINS") {
        let origins: Vec<_> = allowed_origins
            .split(',')
            .map(|s| s.trim().parse().expect("Invalid CORS origin"))
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Allow all origins if not specified (only for development)
        CorsLayer::permissive()
    };

    let (source, destination) = services::create_platforms(&secrets);
    let buffer_pool = Arc::new(BufferPool::new(
        transfer_config.buffer_pool_size,
        transfer_config.max_file_size as usize,
    ));
    let processor = Arc::new(BatchProcessor::new(
        source,
        destination,
        buffer_pool.clone(),
        transfer_config.clone(),
        Arc::new(ProcessMemoryProbe),
    ));

    let app_state = AppState {
        processor,
        transfer_config,
        buffer_pool: buffer_pool.clone(),
        api_secret: secrets.api_secret.clone(),
    };

    // Protected routes that require X-Relay-Secret header
    let protected_routes = Router::new()
        .route("/api/v1/health", get(HealthController::health_check))
        .route("/api/v1/batches", post(TransferController::create_batch))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            validate_relay_secret,
        ));

    let public_routes = Router::new().route("/", get(hello_world));

    let router = Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .layer(cors)
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");

    let released = buffer_pool.cleanup();
    tracing::info!(released, "Buffer pool released, server stopped");
}
