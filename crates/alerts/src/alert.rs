//! Alert artifacts
//!
//! An [`Alert`] is minted from an anomaly of severity high or critical,
//! published to the priority stream, and never mutated by the ingestion
//! path afterwards; acknowledgement and resolution belong to downstream
//! tooling.

use chrono::{DateTime, Utc};
use foundry_detect::{Anomaly, AnomalyKind, Severity};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dispatched notification artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Globally unique id
    pub alert_id: String,
    pub equipment_id: String,
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// False at creation; flipped by downstream tooling only
    pub acknowledged: bool,
    /// False at creation; flipped by downstream tooling only
    pub resolved: bool,
    /// Wall time elapsed since request start when the alert was minted
    pub processing_latency_ms: u64,
}

impl Alert {
    /// Mint an alert from an anomaly
    pub fn from_anomaly(anomaly: &Anomaly, processing_latency_ms: u64) -> Self {
        Self {
            alert_id: Uuid::new_v4().to_string(),
            equipment_id: anomaly.equipment_id.clone(),
            kind: anomaly.kind,
            severity: anomaly.severity,
            message: anomaly.message.clone(),
            timestamp: anomaly.timestamp,
            acknowledged: false,
            resolved: false,
            processing_latency_ms,
        }
    }

    /// Wire message for the alert stream topics
    pub fn to_stream_payload(&self) -> serde_json::Result<Vec<u8>> {
        #[derive(Serialize)]
        struct StreamAlert<'a> {
            #[serde(flatten)]
            alert: &'a Alert,
            /// Publication instant, epoch milliseconds
            published_at: i64,
        }

        serde_json::to_vec(&StreamAlert {
            alert: self,
            published_at: Utc::now().timestamp_millis(),
        })
    }
}

/// Sensor details carried in notification bodies when available
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vibration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
}

/// Structured notification sent to every configured channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertNotification {
    pub alert_id: String,
    pub equipment_id: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor: Option<SensorDetails>,
    pub recommended_actions: Vec<String>,
    /// Deep link into the operations dashboard
    pub dashboard_link: String,
}

/// Result of one channel's delivery attempt
#[derive(Debug, Clone, Serialize)]
pub struct ChannelOutcome {
    pub channel: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What one dispatch accomplished
#[derive(Debug, Clone, Serialize)]
pub struct AlertOutcome {
    pub alert: Alert,
    /// Whether the priority-stream submission succeeded
    pub stream_ok: bool,
    /// Per-channel delivery results
    pub channels: Vec<ChannelOutcome>,
    /// Dispatcher's own latency contribution
    pub latency_ms: u64,
}
