//! Anomaly and severity types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of band-violation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnomalyKind {
    CriticalTemperature,
    HighTemperature,
    HighVibration,
    CriticalVibration,
    AbnormalPressure,
    CriticalPressure,
    PowerSpike,
    EquipmentOffline,
}

impl AnomalyKind {
    /// Wire representation (kebab-case)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CriticalTemperature => "critical-temperature",
            Self::HighTemperature => "high-temperature",
            Self::HighVibration => "high-vibration",
            Self::CriticalVibration => "critical-vibration",
            Self::AbnormalPressure => "abnormal-pressure",
            Self::CriticalPressure => "critical-pressure",
            Self::PowerSpike => "power-spike",
            Self::EquipmentOffline => "equipment-offline",
        }
    }
}

impl std::fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anomaly severity, totally ordered: low < medium < high < critical
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Numeric score for gauge emission (low=1 .. critical=4)
    pub fn score(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }

    /// Whether this severity warrants an alert
    pub fn is_alertable(&self) -> bool {
        *self >= Self::High
    }

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One band violation derived from a single reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub equipment_id: String,
    pub timestamp: DateTime<Utc>,
    /// Observed value
    pub value: f64,
    /// Band boundary that was breached
    pub threshold: f64,
    pub severity: Severity,
    /// Human-readable description
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_total_order() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_alertable_gate() {
        assert!(!Severity::Low.is_alertable());
        assert!(!Severity::Medium.is_alertable());
        assert!(Severity::High.is_alertable());
        assert!(Severity::Critical.is_alertable());
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&AnomalyKind::CriticalTemperature).unwrap();
        assert_eq!(json, "\"critical-temperature\"");
    }
}
