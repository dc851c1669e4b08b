use anyhow::Context;
use readings::config::Config;
use readings::{build_service, init_tracing, metrics, rest};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(false);

    let config = Config::from_env();

    info!("Starting readings service");
    match &config.mongodb_uri {
        Some(uri) => info!("MongoDB: {}", uri.split('@').last().unwrap_or("***")),
        None => warn!("MONGODB_URI is not set; GET and POST requests will fail"),
    }

    metrics::init_metrics().context("failed to register metrics")?;

    let service = Arc::new(build_service(&config));
    let app = rest::create_router(service);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr()))?;

    info!("HTTP server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
