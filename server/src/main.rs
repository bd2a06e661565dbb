//! Todo REST service over a Redis document store.

use anyhow::Context;
use std::sync::Arc;
use todo_server::{Config, seed, telemetry};
use todo_service_core::TodoService;
use todo_service_core::environment::SystemClock;
use todo_service_redis::RedisTodoStore;
use todo_service_web::{AppState, build_router};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    let config = Config::from_env();
    telemetry::init_tracing(config.log_format);

    info!("Starting todo server");
    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "No .env file loaded");
    }
    info!(
        redis_url = %config.redis.url,
        index = %config.redis.index_name,
        key_prefix = %config.redis.key_prefix,
        "Configuration loaded"
    );

    telemetry::init_metrics(&config)?;

    // Setup store
    info!("Connecting to Redis...");
    let store = RedisTodoStore::new(&config.redis.url, config.store_settings())
        .await
        .context("failed to connect to Redis")?;
    store
        .ensure_index()
        .await
        .context("failed to create search index")?;
    info!("Redis connected, index ready");

    let store = Arc::new(store);
    let clock = Arc::new(SystemClock);

    if config.seed.sample_data {
        seed::load_sample_data(store.as_ref(), clock.as_ref())
            .await
            .context("failed to load sample data")?;
    }

    let app = build_router(AppState::new(TodoService::new(store, clock)));

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(address = %addr, "Server listening");

    // Run server with graceful shutdown
    let timeout = config.shutdown_timeout();
    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    let drained = async {
        server.await?;
        Ok::<_, std::io::Error>(())
    };

    tokio::select! {
        result = drained => result.context("server error")?,
        () = async {
            shutdown_signal().await;
            tokio::time::sleep(timeout).await;
        } => warn!(timeout_secs = timeout.as_secs(), "Shutdown timed out, dropping open connections"),
    }

    info!("Server stopped");
    Ok(())
}

/// Graceful shutdown signal handler.
///
/// Waits for:
/// - Ctrl+C (SIGINT)
/// - SIGTERM (in production environments)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
