mod api_doc;
mod config;
mod dispatcher;
mod error;
mod handlers;
mod memory;
mod metrics;
mod models;
mod routes;
mod spanner;
mod state;
mod store;

use std::sync::Arc;

use anyhow::Context;
use config::{Config, StoreBackend};
use memory::InMemoryStore;
use spanner::SpannerStore;
use state::AppState;
use store::RecordStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("rust-spanner-products starting");
    if let Ok(path) = dotenv {
        tracing::info!("Loaded environment from {}", path.display());
    }

    let config = Config::from_env()?;
    config.log_startup();

    let store: Arc<dyn RecordStore> = match config.store_backend {
        StoreBackend::Spanner => Arc::new(SpannerStore::from_config(&config).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory product store; data is lost on restart");
            Arc::new(InMemoryStore::new())
        }
    };

    let app = routes::router(AppState::new(store));

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("rust-spanner-products stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
