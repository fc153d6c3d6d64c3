//! Threshold bands
//!
//! Configured once at process start; hot reload is out of scope.

use serde::{Deserialize, Serialize};

/// A normal/high/critical band for one metric
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Band {
    /// Lower bound of the normal range
    pub normal_min: f64,
    /// Upper bound of the normal range
    pub normal_max: f64,
    /// Above this is critical
    pub critical: f64,
}

/// Threshold bands for every evaluated metric
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    pub temperature: Band,
    pub vibration: Band,
    pub pressure: Band,
    /// Power draw above this is a spike
    pub power_spike: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temperature: Band {
                normal_min: 0.0,
                normal_max: 150.0,
                critical: 180.0,
            },
            vibration: Band {
                normal_min: 0.0,
                normal_max: 2.0,
                critical: 5.0,
            },
            pressure: Band {
                normal_min: 50.0,
                normal_max: 500.0,
                critical: 800.0,
            },
            power_spike: 10_000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands_match_operating_envelope() {
        let t = Thresholds::default();
        assert_eq!(t.temperature.normal_max, 150.0);
        assert_eq!(t.temperature.critical, 180.0);
        assert_eq!(t.vibration.normal_max, 2.0);
        assert_eq!(t.vibration.critical, 5.0);
        assert_eq!(t.pressure.normal_min, 50.0);
        assert_eq!(t.pressure.critical, 800.0);
    }
}
