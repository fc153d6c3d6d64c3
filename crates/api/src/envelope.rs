//! Response envelope
//!
//! Every response - success or failure - uses the same JSON envelope:
//!
//! ```json
//! { "success": bool, "data": {...}, "error": "...", "details": [...], "timestamp": "..." }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The uniform response envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> Envelope<T> {
    /// A successful envelope carrying `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
            timestamp: Utc::now(),
        }
    }
}

impl Envelope<()> {
    /// A failure envelope
    pub fn failure(error: impl Into<String>, details: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            details,
            timestamp: Utc::now(),
        }
    }
}

/// Success payload for the ingestion endpoint
#[derive(Debug, Serialize)]
pub struct IngestData {
    pub message: &'static str,
    pub equipment_id: String,
    pub timestamp: DateTime<Utc>,
    pub anomalies_detected: usize,
    pub alerts_created: usize,
    pub processing_latency_ms: u64,
    /// True iff the request finished inside the 500 ms SLA
    pub sla_compliant: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_shape() {
        let env = Envelope::ok(IngestData {
            message: "reading accepted",
            equipment_id: "PUMP_001".into(),
            timestamp: Utc::now(),
            anomalies_detected: 0,
            alerts_created: 0,
            processing_latency_ms: 12,
            sla_compliant: true,
        });

        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["equipment_id"], "PUMP_001");
        assert_eq!(value["data"]["sla_compliant"], true);
        assert!(value.get("error").is_none());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_failure_envelope_shape() {
        let env = Envelope::failure(
            "Validation failed",
            Some(vec!["equipment_id is required".into()]),
        );

        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "Validation failed");
        assert_eq!(value["details"][0], "equipment_id is required");
        assert!(value.get("data").is_none());
    }
}
