//! Tracing and metrics initialization.

use crate::config::{Config, LogFormat};
use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str =
    "info,todo_server=debug,todo_service_core=debug,tower_http=debug";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides [`DEFAULT_LOG_FILTER`].
pub fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Start the Prometheus exporter when enabled.
///
/// Returns the address it listens on, or `None` when metrics are disabled.
///
/// # Errors
///
/// Invalid address, or the exporter could not be installed.
pub fn init_metrics(config: &Config) -> anyhow::Result<Option<SocketAddr>> {
    if !config.metrics.enabled {
        tracing::info!("Metrics exporter disabled");
        return Ok(None);
    }

    let addr: SocketAddr = config
        .metrics_addr()
        .parse()
        .with_context(|| format!("invalid metrics address {}", config.metrics_addr()))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("failed to install Prometheus exporter")?;

    tracing::info!(address = %addr, "Prometheus metrics available at /metrics");
    Ok(Some(addr))
}
