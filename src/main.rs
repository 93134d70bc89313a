mod config;
mod dto;
mod handlers;
mod models;
mod repository;
mod service;

use std::sync::Arc;

use handlers::rest;
use repository::Repository;
use service::NoteService;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });

    // Store and service creation
    let repo_ptr = Arc::new(tokio::sync::Mutex::new(Repository::new()));
    let service = Arc::new(NoteService::new(repo_ptr));

    let router = rest::router(service);

    let listener = tokio::net::TcpListener::bind(cfg.addr())
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind to {}: {e}", cfg.addr());
            panic!("failed to bind to address: {e}");
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("REST server starting, listening on {}", addr),
        Err(e) => tracing::warn!("REST server starting, local address unknown: {e}"),
    }

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("HTTP server error: {e}");
        panic!("failed to run HTTP server: {e}");
    }

    tracing::info!("REST server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received");
}
