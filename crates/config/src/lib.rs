//! Foundry Configuration
//!
//! Environment-driven configuration for the ingestion pipeline. Every
//! recognized option is an environment variable read once at process start;
//! there is no hot reload.
//!
//! # Recognized variables
//!
//! - `REGION` - target cloud region (default `us-east-1`)
//! - `HOT_STORE_{HOST,PORT,DB,USER,PASSWORD}` - hot tier connectivity
//! - `WARM_STORE_{HOST,PORT,DB,USER,PASSWORD}` - warm tier connectivity
//! - `SHARED_OBJECT_BUCKET` - shared cold-tier bucket
//! - `SHARED_CONNECTION_STRING` - shared hot-tier pool connection string
//! - `STREAM_BROKERS` - comma-separated Kafka bootstrap list
//! - `PRIORITY_ALERT_TOPIC_IDENTIFIER` - notification sink for critical alerts
//! - `DASHBOARD_URL` - base URL interpolated into notification bodies
//! - `ENVIRONMENT` - gates TLS on the stream producer (`production`)
//! - `BIND_ADDR` - HTTP listen address (default `0.0.0.0:8080`)
//! - `PLATFORM_DOMAIN` - second-level domain for subdomain tenant resolution
//! - `TENANTS_FILE` - tenant directory seed file (optional)
//! - `OBJECT_STORE_ENDPOINT` - custom S3 endpoint (MinIO etc., optional)

mod error;
mod store;
mod stream;

pub use error::{ConfigError, Result};
pub use store::StoreConfig;
pub use stream::StreamConfig;

use std::env;

/// Default pool size for the shared hot-tier pool
pub const HOT_POOL_SIZE: u32 = 30;

/// Default pool size for the shared warm-tier pool
pub const WARM_POOL_SIZE: u32 = 20;

/// Pool size ceiling for dedicated per-tenant hot pools
pub const DEDICATED_POOL_SIZE: u32 = 100;

/// Hot-tier connection acquisition timeout
pub const HOT_ACQUIRE_TIMEOUT_MS: u64 = 1000;

/// Warm-tier connection acquisition timeout
pub const WARM_ACQUIRE_TIMEOUT_MS: u64 = 2000;

/// Complete process configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Target cloud region
    pub region: String,

    /// HTTP listen address
    pub bind_addr: String,

    /// Hot (time-series) tier connectivity
    pub hot_store: StoreConfig,

    /// Warm (relational) tier connectivity
    pub warm_store: StoreConfig,

    /// Shared cold-tier bucket
    pub shared_object_bucket: String,

    /// Custom S3-compatible endpoint (MinIO etc.)
    pub object_store_endpoint: Option<String>,

    /// Connection string for the shared hot pool (overrides `hot_store` when set)
    pub shared_connection_string: Option<String>,

    /// Stream bus settings
    pub stream: StreamConfig,

    /// Notification sink identifier for critical alerts
    pub priority_alert_topic: String,

    /// Dashboard base URL for notification bodies
    pub dashboard_url: String,

    /// Deployment environment (`production` enables producer TLS)
    pub environment: String,

    /// Platform domain used for subdomain tenant resolution
    pub platform_domain: String,

    /// Optional tenant directory seed file
    pub tenants_file: Option<String>,
}

impl AppConfig {
    /// Load the full configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is absent or unparseable.
    pub fn from_env() -> Result<Self> {
        let environment = read_var("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let stream = StreamConfig::from_env(&environment)?;

        Ok(Self {
            region: read_var("REGION").unwrap_or_else(|| "us-east-1".to_string()),
            bind_addr: read_var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            hot_store: StoreConfig::from_env(
                "HOT_STORE_HOST",
                "HOT_STORE_PORT",
                "HOT_STORE_DB",
                "HOT_STORE_USER",
                "HOT_STORE_PASSWORD",
                HOT_POOL_SIZE,
                HOT_ACQUIRE_TIMEOUT_MS,
            )?,
            warm_store: StoreConfig::from_env(
                "WARM_STORE_HOST",
                "WARM_STORE_PORT",
                "WARM_STORE_DB",
                "WARM_STORE_USER",
                "WARM_STORE_PASSWORD",
                WARM_POOL_SIZE,
                WARM_ACQUIRE_TIMEOUT_MS,
            )?,
            shared_object_bucket: read_var("SHARED_OBJECT_BUCKET")
                .ok_or_else(|| ConfigError::missing("SHARED_OBJECT_BUCKET"))?,
            object_store_endpoint: read_var("OBJECT_STORE_ENDPOINT"),
            shared_connection_string: read_var("SHARED_CONNECTION_STRING"),
            stream,
            priority_alert_topic: read_var("PRIORITY_ALERT_TOPIC_IDENTIFIER")
                .unwrap_or_else(|| "manufacturing-alerts-priority".to_string()),
            dashboard_url: read_var("DASHBOARD_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            environment,
            platform_domain: read_var("PLATFORM_DOMAIN")
                .unwrap_or_else(|| "foundry".to_string()),
            tenants_file: read_var("TENANTS_FILE"),
        })
    }

    /// Effective connection URL for the shared hot pool
    pub fn shared_hot_url(&self) -> String {
        self.shared_connection_string
            .clone()
            .unwrap_or_else(|| self.hot_store.connection_url())
    }

    /// True when running against production infrastructure
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Log the non-secret parts of the configuration at startup
    pub fn log_summary(&self) {
        tracing::info!(
            region = %self.region,
            bind_addr = %self.bind_addr,
            environment = %self.environment,
            hot_store = %self.hot_store.host,
            warm_store = %self.warm_store.host,
            shared_bucket = %self.shared_object_bucket,
            brokers = %self.stream.brokers,
            "configuration loaded"
        );
    }
}

/// Read an environment variable, treating empty values as unset
pub(crate) fn read_var(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_production() {
        let mut cfg = test_config();
        assert!(!cfg.is_production());
        cfg.environment = "Production".into();
        assert!(cfg.is_production());
    }

    #[test]
    fn test_shared_hot_url_prefers_override() {
        let mut cfg = test_config();
        assert!(cfg.shared_hot_url().starts_with("postgres://"));
        cfg.shared_connection_string = Some("postgres://override/db".into());
        assert_eq!(cfg.shared_hot_url(), "postgres://override/db");
    }

    fn test_config() -> AppConfig {
        AppConfig {
            region: "us-east-1".into(),
            bind_addr: "0.0.0.0:8080".into(),
            hot_store: StoreConfig {
                host: "hot.internal".into(),
                port: 5432,
                database: "telemetry".into(),
                user: "ingest".into(),
                password: String::new(),
                max_connections: HOT_POOL_SIZE,
                acquire_timeout_ms: HOT_ACQUIRE_TIMEOUT_MS,
            },
            warm_store: StoreConfig {
                host: "warm.internal".into(),
                port: 5432,
                database: "equipment".into(),
                user: "ingest".into(),
                password: String::new(),
                max_connections: WARM_POOL_SIZE,
                acquire_timeout_ms: WARM_ACQUIRE_TIMEOUT_MS,
            },
            shared_object_bucket: "foundry-telemetry".into(),
            object_store_endpoint: None,
            shared_connection_string: None,
            stream: StreamConfig {
                brokers: "localhost:9092".into(),
                use_tls: false,
            },
            priority_alert_topic: "manufacturing-alerts-priority".into(),
            dashboard_url: "http://localhost:3000".into(),
            environment: "development".into(),
            platform_domain: "foundry".into(),
            tenants_file: None,
        }
    }
}
