//! Threshold-band anomaly detection
//!
//! Synchronous and pure: one pass over the reading's measurements, each
//! metric evaluated independently against its band. The highest applicable
//! band wins per metric, so a reading never produces both the high and
//! critical variant for the same measurement. Bounded allocation (at most
//! one anomaly per metric) keeps a single evaluation well under the 5 ms
//! hot-path budget.

use crate::anomaly::{Anomaly, AnomalyKind, Severity};
use crate::reading::SensorReading;
use crate::thresholds::Thresholds;

/// Evaluates readings against configured threshold bands
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    thresholds: Thresholds,
}

impl AnomalyDetector {
    /// Create a detector with the given bands
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// The configured bands
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Evaluate one reading, returning zero or more anomalies
    pub fn detect(&self, reading: &SensorReading) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();

        if let Some(t) = reading.temperature {
            if let Some(a) = self.check_temperature(reading, t) {
                anomalies.push(a);
            }
        }
        if let Some(v) = reading.vibration {
            if let Some(a) = self.check_vibration(reading, v) {
                anomalies.push(a);
            }
        }
        if let Some(p) = reading.pressure {
            if let Some(a) = self.check_pressure(reading, p) {
                anomalies.push(a);
            }
        }
        if let Some(w) = reading.power_consumption {
            if let Some(a) = self.check_power(reading, w) {
                anomalies.push(a);
            }
        }

        anomalies
    }

    fn check_temperature(&self, reading: &SensorReading, value: f64) -> Option<Anomaly> {
        let band = self.thresholds.temperature;
        if value > band.critical {
            Some(anomaly(
                reading,
                AnomalyKind::CriticalTemperature,
                Severity::Critical,
                value,
                band.critical,
                format!("temperature {value:.1} exceeds critical limit {:.1}", band.critical),
            ))
        } else if value > band.normal_max {
            Some(anomaly(
                reading,
                AnomalyKind::HighTemperature,
                Severity::High,
                value,
                band.normal_max,
                format!("temperature {value:.1} exceeds high limit {:.1}", band.normal_max),
            ))
        } else if value < band.normal_min {
            Some(anomaly(
                reading,
                AnomalyKind::HighTemperature,
                Severity::Medium,
                value,
                band.normal_min,
                format!("temperature {value:.1} below normal minimum {:.1}", band.normal_min),
            ))
        } else {
            None
        }
    }

    fn check_vibration(&self, reading: &SensorReading, value: f64) -> Option<Anomaly> {
        let band = self.thresholds.vibration;
        if value > band.critical {
            Some(anomaly(
                reading,
                AnomalyKind::CriticalVibration,
                Severity::Critical,
                value,
                band.critical,
                format!("vibration {value:.2} exceeds critical limit {:.2}", band.critical),
            ))
        } else if value > band.normal_max {
            Some(anomaly(
                reading,
                AnomalyKind::HighVibration,
                Severity::High,
                value,
                band.normal_max,
                format!("vibration {value:.2} exceeds high limit {:.2}", band.normal_max),
            ))
        } else {
            None
        }
    }

    fn check_pressure(&self, reading: &SensorReading, value: f64) -> Option<Anomaly> {
        let band = self.thresholds.pressure;
        if value > band.critical {
            Some(anomaly(
                reading,
                AnomalyKind::CriticalPressure,
                Severity::Critical,
                value,
                band.critical,
                format!("pressure {value:.1} exceeds critical limit {:.1}", band.critical),
            ))
        } else if value > band.normal_max {
            Some(anomaly(
                reading,
                AnomalyKind::AbnormalPressure,
                Severity::Medium,
                value,
                band.normal_max,
                format!("pressure {value:.1} exceeds normal maximum {:.1}", band.normal_max),
            ))
        } else if value < band.normal_min {
            Some(anomaly(
                reading,
                AnomalyKind::AbnormalPressure,
                Severity::Medium,
                value,
                band.normal_min,
                format!("pressure {value:.1} below normal minimum {:.1}", band.normal_min),
            ))
        } else {
            None
        }
    }

    fn check_power(&self, reading: &SensorReading, value: f64) -> Option<Anomaly> {
        let limit = self.thresholds.power_spike;
        if value > limit {
            Some(anomaly(
                reading,
                AnomalyKind::PowerSpike,
                Severity::High,
                value,
                limit,
                format!("power draw {value:.0} exceeds spike limit {limit:.0}"),
            ))
        } else {
            None
        }
    }
}

fn anomaly(
    reading: &SensorReading,
    kind: AnomalyKind,
    severity: Severity,
    value: f64,
    threshold: f64,
    message: String,
) -> Anomaly {
    Anomaly {
        kind,
        equipment_id: reading.equipment_id.clone(),
        timestamp: reading.timestamp,
        value,
        threshold,
        severity,
        message,
    }
}

#[cfg(test)]
#[path = "detector_test.rs"]
mod detector_test;
