//! Stream bus publisher
//!
//! One producer instance is shared by the whole process (rdkafka producers
//! are internally thread-safe). The producer is tuned for latency over
//! throughput: no lingering, single-message batches, leader-only
//! acknowledgement, no compression, idempotence off. Connection state is
//! established lazily by the client on first delivery.

use std::time::Duration;

use rdkafka::ClientConfig;
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};

use crate::error::{Result, StreamError};

/// Consumer-side filtering headers carried on every message
#[derive(Debug, Clone, Default)]
pub struct MessageHeaders {
    /// Anomaly severity (`low` .. `critical`)
    pub severity: Option<String>,
    /// Originating equipment
    pub equipment_id: Option<String>,
}

impl MessageHeaders {
    /// Headers for an alert message
    pub fn alert(severity: impl Into<String>, equipment_id: impl Into<String>) -> Self {
        Self {
            severity: Some(severity.into()),
            equipment_id: Some(equipment_id.into()),
        }
    }

    fn to_owned_headers(&self) -> OwnedHeaders {
        let mut headers = OwnedHeaders::new();
        if let Some(ref severity) = self.severity {
            headers = headers.insert(Header {
                key: "severity",
                value: Some(severity.as_bytes()),
            });
        }
        if let Some(ref equipment_id) = self.equipment_id {
            headers = headers.insert(Header {
                key: "equipment_id",
                value: Some(equipment_id.as_bytes()),
            });
        }
        headers
    }
}

/// Build the low-latency producer configuration
///
/// Kept separate from producer creation so the option map is testable
/// without a broker.
pub(crate) fn low_latency_config(brokers: &str, use_tls: bool) -> ClientConfig {
    let mut config = ClientConfig::new();
    config.set("bootstrap.servers", brokers);
    config.set("linger.ms", "0");
    config.set("batch.num.messages", "1");
    config.set("acks", "1");
    config.set("compression.type", "none");
    config.set("enable.idempotence", "false");
    config.set("message.timeout.ms", "5000");

    if use_tls {
        config.set("security.protocol", "ssl");
    }

    config
}

/// Process-wide stream bus publisher
pub struct StreamPublisher {
    producer: FutureProducer,
}

impl StreamPublisher {
    /// Create a publisher for the given broker list
    pub fn new(brokers: &str, use_tls: bool) -> Result<Self> {
        let producer: FutureProducer = low_latency_config(brokers, use_tls)
            .create()
            .map_err(|e| StreamError::Create(e.to_string()))?;

        tracing::info!(brokers = %brokers, use_tls, "stream producer created");

        Ok(Self { producer })
    }

    /// Publish one message and await broker acknowledgement
    pub async fn publish(
        &self,
        topic: &str,
        key: &str,
        payload: &[u8],
        headers: &MessageHeaders,
    ) -> Result<()> {
        let record = FutureRecord::to(topic)
            .key(key)
            .payload(payload)
            .headers(headers.to_owned_headers());

        self.producer
            .send(record, Duration::from_secs(5))
            .await
            .map_err(|(e, _)| StreamError::publish(topic, e.to_string()))?;

        tracing::trace!(topic = %topic, key = %key, "message published");
        Ok(())
    }

    /// Publish with a delivery budget
    ///
    /// Exceeding the budget returns [`StreamError::Timeout`]; the message
    /// may still be delivered by the producer's internal buffer afterwards.
    pub async fn publish_with_timeout(
        &self,
        topic: &str,
        key: &str,
        payload: &[u8],
        headers: &MessageHeaders,
        budget: Duration,
    ) -> Result<()> {
        match tokio::time::timeout(budget, self.publish(topic, key, payload, headers)).await {
            Ok(result) => result,
            Err(_) => Err(StreamError::Timeout {
                topic: topic.to_string(),
                budget_ms: budget.as_millis() as u64,
            }),
        }
    }

    /// Flush buffered messages on shutdown
    pub fn disconnect(&self, wait: Duration) {
        if let Err(e) = self.producer.flush(wait) {
            tracing::warn!(error = %e, "producer flush on shutdown failed");
        }
    }
}

#[cfg(test)]
#[path = "publisher_test.rs"]
mod publisher_test;
