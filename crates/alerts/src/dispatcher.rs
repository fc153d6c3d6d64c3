//! Alert dispatcher
//!
//! Runs on the request critical path for every anomaly of severity high or
//! critical. The priority-stream submission is the one thing the caller
//! truly waits for; metrics emission and notification delivery run
//! concurrently under a combined 100 ms budget and are abandoned (with a
//! logged warning) when they overrun. Nothing here ever fails the request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use foundry_dataplane::DataPlane;
use foundry_detect::{Anomaly, SensorReading, Severity};
use foundry_stream::{CriticalMessage, CriticalQueue, MessageHeaders, StreamError, StreamPublisher};
use foundry_tenant::TenantContext;
use futures::future::join_all;

use crate::actions::recommended_actions;
use crate::alert::{Alert, AlertNotification, AlertOutcome, ChannelOutcome, SensorDetails};
use crate::observe::{ObservabilitySink, emit_alert_metrics};
use crate::sinks::{NotificationSink, TopicSink, WebhookSink};

/// Combined budget for metrics and notification channels
pub const DISPATCH_BUDGET: Duration = Duration::from_millis(100);

/// Delivery budget for awaited (high-severity) stream publishes
pub const HIGH_PUBLISH_BUDGET: Duration = Duration::from_millis(100);

/// Dispatches alerts to the priority stream and notification channels
pub struct AlertDispatcher {
    publisher: Arc<StreamPublisher>,
    critical_queue: CriticalQueue,
    observability: Arc<dyn ObservabilitySink>,
    dashboard_url: String,
    http: reqwest::Client,
}

impl AlertDispatcher {
    /// Create a dispatcher
    pub fn new(
        publisher: Arc<StreamPublisher>,
        critical_queue: CriticalQueue,
        observability: Arc<dyn ObservabilitySink>,
        dashboard_url: impl Into<String>,
    ) -> Self {
        Self {
            publisher,
            critical_queue,
            observability,
            dashboard_url: dashboard_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Dispatch one qualifying anomaly
    ///
    /// `request_started` anchors the alert's `processing_latency_ms`.
    pub async fn dispatch(
        &self,
        anomaly: &Anomaly,
        reading: Option<&SensorReading>,
        ctx: &TenantContext,
        plane: &DataPlane,
        request_started: Instant,
    ) -> AlertOutcome {
        debug_assert!(anomaly.severity.is_alertable());

        let started = Instant::now();
        let alert = Alert::from_anomaly(anomaly, request_started.elapsed().as_millis() as u64);

        let (stream_ok, channels) = tokio::join!(
            self.publish_priority(&alert, &plane.topics.priority_alerts),
            self.emit_side_channels(&alert, anomaly, reading, ctx, plane),
        );

        tracing::info!(
            alert_id = %alert.alert_id,
            tenant_id = %ctx.tenant_id,
            equipment_id = %alert.equipment_id,
            severity = %alert.severity,
            stream_ok,
            channels = channels.len(),
            "alert dispatched"
        );

        AlertOutcome {
            alert,
            stream_ok,
            channels,
            latency_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Step 2: priority-stream publish
    ///
    /// Critical severity enqueues fire-and-forget; high severity awaits
    /// delivery up to [`HIGH_PUBLISH_BUDGET`]. A timeout leaves the message
    /// in the producer's buffer, so it counts as a successful submission.
    async fn publish_priority(&self, alert: &Alert, topic: &str) -> bool {
        let payload = match alert.to_stream_payload() {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(alert_id = %alert.alert_id, error = %e, "alert serialization failed");
                return false;
            }
        };
        let headers = MessageHeaders::alert(alert.severity.as_str(), alert.equipment_id.clone());

        if alert.severity == Severity::Critical {
            match self.critical_queue.try_enqueue(CriticalMessage {
                topic: topic.to_string(),
                key: alert.equipment_id.clone(),
                payload,
                headers,
            }) {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!(alert_id = %alert.alert_id, error = %e, "critical alert not enqueued");
                    false
                }
            }
        } else {
            match self
                .publisher
                .publish_with_timeout(topic, &alert.equipment_id, &payload, &headers, HIGH_PUBLISH_BUDGET)
                .await
            {
                Ok(()) => true,
                Err(StreamError::Timeout { .. }) => {
                    tracing::warn!(
                        alert_id = %alert.alert_id,
                        topic = %topic,
                        "priority publish acknowledgement outstanding past budget"
                    );
                    true
                }
                Err(e) => {
                    tracing::error!(alert_id = %alert.alert_id, error = %e, "priority publish failed");
                    false
                }
            }
        }
    }

    /// Steps 3-4: metrics and notifications under the combined budget
    async fn emit_side_channels(
        &self,
        alert: &Alert,
        anomaly: &Anomaly,
        reading: Option<&SensorReading>,
        ctx: &TenantContext,
        plane: &DataPlane,
    ) -> Vec<ChannelOutcome> {
        let notification = self.build_notification(alert, anomaly, reading);
        let sinks = self.build_sinks(plane);
        let channel_names: Vec<String> = sinks.iter().map(|s| s.name().to_string()).collect();

        let work = async {
            emit_alert_metrics(self.observability.as_ref(), &ctx.tenant_id, anomaly);

            join_all(sinks.iter().map(|sink| async {
                match sink.publish(&notification).await {
                    Ok(()) => ChannelOutcome {
                        channel: sink.name().to_string(),
                        ok: true,
                        error: None,
                    },
                    Err(e) => {
                        tracing::warn!(
                            channel = %sink.name(),
                            alert_id = %notification.alert_id,
                            error = %e,
                            "notification delivery failed"
                        );
                        ChannelOutcome {
                            channel: sink.name().to_string(),
                            ok: false,
                            error: Some(e.to_string()),
                        }
                    }
                }
            }))
            .await
        };

        match tokio::time::timeout(DISPATCH_BUDGET, work).await {
            Ok(outcomes) => outcomes,
            Err(_) => {
                tracing::warn!(
                    alert_id = %alert.alert_id,
                    budget_ms = DISPATCH_BUDGET.as_millis() as u64,
                    "dispatch budget exceeded, notification channels abandoned"
                );
                channel_names
                    .into_iter()
                    .map(|channel| ChannelOutcome {
                        channel,
                        ok: false,
                        error: Some("dispatch budget exceeded".to_string()),
                    })
                    .collect()
            }
        }
    }

    fn build_notification(
        &self,
        alert: &Alert,
        anomaly: &Anomaly,
        reading: Option<&SensorReading>,
    ) -> AlertNotification {
        AlertNotification {
            alert_id: alert.alert_id.clone(),
            equipment_id: alert.equipment_id.clone(),
            severity: alert.severity,
            timestamp: alert.timestamp,
            message: alert.message.clone(),
            sensor: reading.map(|r| SensorDetails {
                temperature: r.temperature,
                vibration: r.vibration,
                pressure: r.pressure,
                facility_id: r.facility_id.clone(),
                line_id: r.line_id.clone(),
            }),
            recommended_actions: recommended_actions(anomaly.kind)
                .iter()
                .map(|s| s.to_string())
                .collect(),
            dashboard_link: format!(
                "{}/equipment/{}?alert={}",
                self.dashboard_url, alert.equipment_id, alert.alert_id
            ),
        }
    }

    fn build_sinks(&self, plane: &DataPlane) -> Vec<Box<dyn NotificationSink>> {
        let mut sinks: Vec<Box<dyn NotificationSink>> = Vec::new();

        for topic in &plane.alert_sinks.notification_topics {
            sinks.push(Box::new(TopicSink::new(
                topic.clone(),
                Arc::clone(&self.publisher),
            )));
        }
        for url in &plane.alert_sinks.webhook_urls {
            sinks.push(Box::new(WebhookSink::new(url.clone(), self.http.clone())));
        }

        sinks
    }
}

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod dispatcher_test;
