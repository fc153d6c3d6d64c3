//! Notification channels
//!
//! Every channel is a value implementing [`NotificationSink`]; the
//! dispatcher iterates a tenant's configured sinks uniformly and records a
//! per-channel outcome. Failures stay inside the channel - the stream topic
//! is the authoritative durable sink, notifications are best-effort.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use foundry_stream::{MessageHeaders, StreamPublisher};

use crate::alert::AlertNotification;
use crate::error::{AlertError, Result};

/// One notification delivery channel
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Channel name for outcome recording
    fn name(&self) -> &str;

    /// Deliver one notification
    async fn publish(&self, notification: &AlertNotification) -> Result<()>;
}

/// Publishes notifications onto a stream topic
pub struct TopicSink {
    topic: String,
    publisher: Arc<StreamPublisher>,
}

impl TopicSink {
    pub fn new(topic: impl Into<String>, publisher: Arc<StreamPublisher>) -> Self {
        Self {
            topic: topic.into(),
            publisher,
        }
    }
}

#[async_trait]
impl NotificationSink for TopicSink {
    fn name(&self) -> &str {
        &self.topic
    }

    async fn publish(&self, notification: &AlertNotification) -> Result<()> {
        let payload = serde_json::to_vec(notification)?;
        let headers = MessageHeaders::alert(
            notification.severity.as_str(),
            notification.equipment_id.clone(),
        );

        self.publisher
            .publish(&self.topic, &notification.equipment_id, &payload, &headers)
            .await?;
        Ok(())
    }
}

/// POSTs notification bodies to a tenant webhook
pub struct WebhookSink {
    url: String,
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    fn name(&self) -> &str {
        &self.url
    }

    async fn publish(&self, notification: &AlertNotification) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(notification)
            .timeout(Duration::from_millis(5000))
            .send()
            .await
            .map_err(|e| AlertError::webhook(&self.url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(AlertError::webhook(
                &self.url,
                format!("status {}", response.status()),
            ));
        }
        Ok(())
    }
}

/// Renders notifications as log events (development)
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn publish(&self, notification: &AlertNotification) -> Result<()> {
        tracing::info!(
            alert_id = %notification.alert_id,
            equipment_id = %notification.equipment_id,
            severity = %notification.severity,
            message = %notification.message,
            "alert notification"
        );
        Ok(())
    }
}
