//! Reading content hash
//!
//! Deduplication key stored alongside every hot-tier row: two readings with
//! the same equipment, timestamp, and measurement triple hash identically,
//! so a replayed request upserts into a no-op.

use chrono::SecondsFormat;
use foundry_detect::SensorReading;
use sha2::{Digest, Sha256};

/// Hash the identity and measurement triple of a reading
pub fn content_hash(reading: &SensorReading) -> String {
    let mut hasher = Sha256::new();
    hasher.update(reading.equipment_id.as_bytes());
    hasher.update(b"|");
    hasher.update(
        reading
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .as_bytes(),
    );
    for value in [reading.temperature, reading.vibration, reading.pressure] {
        hasher.update(b"|");
        match value {
            Some(v) => hasher.update(v.to_bits().to_be_bytes()),
            None => hasher.update(b"-"),
        }
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use foundry_detect::RawReading;

    fn reading(temperature: Option<f64>) -> SensorReading {
        RawReading {
            equipment_id: Some("PUMP_001".into()),
            timestamp: Some("2025-11-23T10:30:00Z".parse().unwrap()),
            temperature,
            vibration: Some(1.2),
            pressure: Some(250.8),
            ..Default::default()
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_identical_readings_hash_identically() {
        assert_eq!(
            content_hash(&reading(Some(75.5))),
            content_hash(&reading(Some(75.5)))
        );
    }

    #[test]
    fn test_measurement_changes_the_hash() {
        assert_ne!(
            content_hash(&reading(Some(75.5))),
            content_hash(&reading(Some(75.6)))
        );
        assert_ne!(
            content_hash(&reading(Some(75.5))),
            content_hash(&reading(None))
        );
    }

    #[test]
    fn test_enrichment_does_not_change_the_hash() {
        let plain = reading(Some(75.5));
        let mut enriched = plain.clone();
        enriched.enrich(Utc::now());
        assert_eq!(content_hash(&plain), content_hash(&enriched));
    }
}
