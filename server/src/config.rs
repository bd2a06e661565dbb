//! Configuration management for the todo server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! A `.env` file is read first when present (see `main`).

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use todo_service_redis::StoreSettings;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Redis configuration
    pub redis: RedisConfig,
    /// Prometheus exporter configuration
    pub metrics: MetricsConfig,
    /// Sample data bootstrap
    pub seed: SeedConfig,
    /// Log output format
    pub log_format: LogFormat,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

/// Redis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: String,
    /// Search index name
    pub index_name: String,
    /// Key prefix of todo documents
    pub key_prefix: String,
    /// Largest result set a single query returns
    pub query_limit: u64,
}

/// Metrics configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether the Prometheus listener is started
    pub enabled: bool,
    /// Metrics server host (for Prometheus scraping)
    pub host: String,
    /// Metrics server port
    pub port: u16,
}

/// Sample data configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Wipe the store and load the sample todos on startup.
    ///
    /// Default: `false`
    pub sample_data: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Missing or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let defaults = StoreSettings::default();

        Self {
            server: ServerConfig {
                host: string("HOST", "0.0.0.0"),
                port: parsed(&lookup, "PORT", 8080),
                shutdown_timeout: parsed(&lookup, "SHUTDOWN_TIMEOUT", 30),
            },
            redis: RedisConfig {
                url: string("REDIS_URL", "redis://localhost:6379"),
                index_name: string("REDIS_INDEX_NAME", &defaults.index_name),
                key_prefix: string("REDIS_KEY_PREFIX", &defaults.key_prefix),
                query_limit: parsed(&lookup, "REDIS_QUERY_LIMIT", defaults.query_limit),
            },
            metrics: MetricsConfig {
                enabled: parsed(&lookup, "METRICS_ENABLED", true),
                host: string("METRICS_HOST", "0.0.0.0"),
                port: parsed(&lookup, "METRICS_PORT", 9090),
            },
            seed: SeedConfig {
                sample_data: parsed(&lookup, "SEED_SAMPLE_DATA", false),
            },
            log_format: parsed(&lookup, "LOG_FORMAT", LogFormat::default()),
        }
    }

    /// Address the HTTP server binds to.
    #[must_use]
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Address the Prometheus listener binds to.
    #[must_use]
    pub fn metrics_addr(&self) -> String {
        format!("{}:{}", self.metrics.host, self.metrics.port)
    }

    /// Graceful shutdown budget.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout)
    }

    /// Store settings derived from the Redis section.
    #[must_use]
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            index_name: self.redis.index_name.clone(),
            key_prefix: self.redis.key_prefix.clone(),
            query_limit: self.redis.query_limit,
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);

        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
        assert_eq!(config.redis.url, "redis://localhost:6379");
        assert_eq!(config.store_settings(), StoreSettings::default());
        assert!(config.metrics.enabled);
        assert_eq!(config.metrics_addr(), "0.0.0.0:9090");
        assert!(!config.seed.sample_data);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "3000"),
            ("REDIS_URL", "redis://cache:6380"),
            ("REDIS_KEY_PREFIX", "t:"),
            ("REDIS_QUERY_LIMIT", "50"),
            ("METRICS_ENABLED", "false"),
            ("SEED_SAMPLE_DATA", "true"),
            ("LOG_FORMAT", "JSON"),
        ]);

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.redis.url, "redis://cache:6380");
        assert_eq!(config.store_settings().key_prefix, "t:");
        assert_eq!(config.store_settings().query_limit, 50);
        assert!(!config.metrics.enabled);
        assert!(config.seed.sample_data);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = config(&[("PORT", "eighty"), ("SEED_SAMPLE_DATA", "yes please")]);

        assert_eq!(config.server.port, 8080);
        assert!(!config.seed.sample_data);
    }
}
