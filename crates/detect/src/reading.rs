//! Sensor reading model
//!
//! Readings arrive as loosely-typed JSON ([`RawReading`]) and are validated
//! into [`SensorReading`] before any downstream work. Enrichment fields are
//! filled in by the ingestion orchestrator, not the sender.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::anomaly::Anomaly;

/// Source tag stamped onto readings accepted over HTTP
pub const HTTP_INGEST_SOURCE: &str = "http_ingest";

/// A reading exactly as the sender posted it, nothing guaranteed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReading {
    pub equipment_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub temperature: Option<f64>,
    pub vibration: Option<f64>,
    pub pressure: Option<f64>,
    pub power_consumption: Option<f64>,
    pub facility_id: Option<String>,
    pub line_id: Option<String>,
    pub custom_metrics: Option<serde_json::Map<String, serde_json::Value>>,
}

impl RawReading {
    /// Validate required fields and measurement ranges
    ///
    /// Collects every violation so the caller can return one response
    /// enumerating all of them.
    pub fn validate(self) -> Result<SensorReading, Vec<String>> {
        let mut problems = Vec::new();

        if self
            .equipment_id
            .as_deref()
            .map(str::trim)
            .is_none_or(str::is_empty)
        {
            problems.push("equipment_id is required".to_string());
        }
        if self.timestamp.is_none() {
            problems.push("timestamp is required".to_string());
        }

        check_range(&mut problems, "temperature", self.temperature, -273.0, 1000.0);
        check_range(&mut problems, "vibration", self.vibration, 0.0, 100.0);
        check_range(&mut problems, "pressure", self.pressure, 0.0, 10_000.0);
        if let Some(power) = self.power_consumption {
            if power < 0.0 {
                problems.push("power_consumption must be non-negative".to_string());
            }
        }

        if !problems.is_empty() {
            return Err(problems);
        }

        Ok(SensorReading {
            equipment_id: self.equipment_id.unwrap_or_default().trim().to_string(),
            timestamp: self.timestamp.unwrap_or_default(),
            temperature: self.temperature,
            vibration: self.vibration,
            pressure: self.pressure,
            power_consumption: self.power_consumption,
            facility_id: self.facility_id,
            line_id: self.line_id,
            custom_metrics: self.custom_metrics,
            ingestion_timestamp: None,
            source: None,
            has_anomalies: false,
            anomalies: Vec::new(),
        })
    }
}

fn check_range(problems: &mut Vec<String>, field: &str, value: Option<f64>, min: f64, max: f64) {
    if let Some(v) = value {
        if !(min..=max).contains(&v) {
            problems.push(format!("{field} must be between {min} and {max}"));
        }
    }
}

/// A validated, possibly enriched sensor reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReading {
    pub equipment_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vibration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_consumption: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_metrics: Option<serde_json::Map<String, serde_json::Value>>,

    /// When the pipeline accepted the reading (enrichment)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingestion_timestamp: Option<DateTime<Utc>>,

    /// Which ingest path accepted the reading (enrichment)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Whether detection flagged this reading (enrichment)
    #[serde(default)]
    pub has_anomalies: bool,

    /// Anomalies attached by detection (enrichment)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<Anomaly>,
}

impl SensorReading {
    /// Stamp the enrichment fields for the HTTP ingest path
    pub fn enrich(&mut self, accepted_at: DateTime<Utc>) {
        self.ingestion_timestamp = Some(accepted_at);
        self.source = Some(HTTP_INGEST_SOURCE.to_string());
    }

    /// Attach detection output
    pub fn attach_anomalies(&mut self, anomalies: Vec<Anomaly>) {
        self.has_anomalies = !anomalies.is_empty();
        self.anomalies = anomalies;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_identity_fields() {
        let raw = RawReading {
            temperature: Some(75.0),
            ..Default::default()
        };
        let problems = raw.validate().unwrap_err();
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("equipment_id"));
        assert!(problems[1].contains("timestamp"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_measurements() {
        let raw = RawReading {
            equipment_id: Some("PUMP_001".into()),
            timestamp: Some(Utc::now()),
            temperature: Some(-400.0),
            vibration: Some(150.0),
            ..Default::default()
        };
        let problems = raw.validate().unwrap_err();
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn test_validate_accepts_minimal_reading() {
        let raw = RawReading {
            equipment_id: Some("PUMP_001".into()),
            timestamp: Some(Utc::now()),
            ..Default::default()
        };
        let reading = raw.validate().unwrap();
        assert_eq!(reading.equipment_id, "PUMP_001");
        assert!(!reading.has_anomalies);
    }

    #[test]
    fn test_blank_equipment_id_is_missing() {
        let raw = RawReading {
            equipment_id: Some("   ".into()),
            timestamp: Some(Utc::now()),
            ..Default::default()
        };
        let problems = raw.validate().unwrap_err();
        assert!(problems[0].contains("equipment_id"));
    }

    #[test]
    fn test_enrich_stamps_source() {
        let raw = RawReading {
            equipment_id: Some("PUMP_001".into()),
            timestamp: Some(Utc::now()),
            ..Default::default()
        };
        let mut reading = raw.validate().unwrap();
        let now = Utc::now();
        reading.enrich(now);
        assert_eq!(reading.source.as_deref(), Some(HTTP_INGEST_SOURCE));
        assert_eq!(reading.ingestion_timestamp, Some(now));
    }
}
