//! Stream bus settings

use crate::error::{ConfigError, Result};
use crate::read_var;

/// Kafka connectivity for the stream publisher
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Comma-separated bootstrap broker list
    pub brokers: String,

    /// Whether the producer connects over TLS
    pub use_tls: bool,
}

impl StreamConfig {
    /// Load stream settings from `STREAM_BROKERS`
    ///
    /// TLS is required when the deployment environment is `production`.
    pub fn from_env(environment: &str) -> Result<Self> {
        let brokers =
            read_var("STREAM_BROKERS").ok_or_else(|| ConfigError::missing("STREAM_BROKERS"))?;

        if brokers.split(',').any(|b| b.trim().is_empty()) {
            return Err(ConfigError::invalid_var(
                "STREAM_BROKERS",
                "empty entry in broker list",
            ));
        }

        Ok(Self {
            brokers,
            use_tls: environment.eq_ignore_ascii_case("production"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tls_gated_on_environment() {
        std::env::set_var("STREAM_BROKERS", "k1:9092,k2:9092");
        let dev = StreamConfig::from_env("development").unwrap();
        assert!(!dev.use_tls);
        let prod = StreamConfig::from_env("production").unwrap();
        assert!(prod.use_tls);
        std::env::remove_var("STREAM_BROKERS");
    }
}
