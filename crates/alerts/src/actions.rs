//! Recommended operator actions per anomaly kind
//!
//! Static playbook snippets embedded into every notification body.

use foundry_detect::AnomalyKind;

/// Recommended actions for an anomaly kind
pub fn recommended_actions(kind: AnomalyKind) -> &'static [&'static str] {
    match kind {
        AnomalyKind::CriticalTemperature => &[
            "Initiate emergency shutdown procedure",
            "Dispatch maintenance team immediately",
            "Verify coolant system operation",
        ],
        AnomalyKind::HighTemperature => &[
            "Inspect cooling system at next rotation",
            "Increase monitoring frequency for this unit",
        ],
        AnomalyKind::CriticalVibration => &[
            "Stop equipment to prevent bearing damage",
            "Schedule vibration analysis before restart",
        ],
        AnomalyKind::HighVibration => &[
            "Check mounting bolts and couplings",
            "Schedule bearing inspection",
        ],
        AnomalyKind::CriticalPressure => &[
            "Activate pressure relief procedure",
            "Isolate the affected line",
        ],
        AnomalyKind::AbnormalPressure => &[
            "Inspect pressure regulators and seals",
            "Compare against line baseline pressure",
        ],
        AnomalyKind::PowerSpike => &[
            "Inspect electrical connections and drives",
            "Review duty cycle for overload conditions",
        ],
        AnomalyKind::EquipmentOffline => &[
            "Verify network connectivity to the unit",
            "Confirm equipment power state on site",
        ],
    }
}
