//! Observability emission
//!
//! The dispatcher emits dimensioned counters and gauges for every alert.
//! The sink is a trait so deployments can point emission at their metrics
//! backend; the default renders structured log events, which the platform's
//! log pipeline already scrapes.

use foundry_detect::Anomaly;

/// Dimension list: `(name, value)` pairs
pub type Dimensions<'a> = &'a [(&'a str, &'a str)];

/// Destination for metric records
pub trait ObservabilitySink: Send + Sync {
    /// Record a counter increment
    fn record_count(&self, name: &str, value: u64, dimensions: Dimensions<'_>);

    /// Record a gauge sample
    fn record_gauge(&self, name: &str, value: f64, dimensions: Dimensions<'_>);
}

/// Sink that renders metric records as structured log events
#[derive(Debug, Default)]
pub struct TracingSink;

impl ObservabilitySink for TracingSink {
    fn record_count(&self, name: &str, value: u64, dimensions: Dimensions<'_>) {
        tracing::info!(metric = name, value, dimensions = ?dimensions, "count");
    }

    fn record_gauge(&self, name: &str, value: f64, dimensions: Dimensions<'_>) {
        tracing::info!(metric = name, value, dimensions = ?dimensions, "gauge");
    }
}

/// Emit the alert metric family for one anomaly
pub fn emit_alert_metrics(
    sink: &dyn ObservabilitySink,
    tenant_id: &str,
    anomaly: &Anomaly,
) {
    let severity = anomaly.severity.as_str();
    let kind = anomaly.kind.as_str();

    sink.record_count(
        "alerts.created",
        1,
        &[
            ("tenant", tenant_id),
            ("equipment", &anomaly.equipment_id),
            ("kind", kind),
            ("severity", severity),
        ],
    );

    sink.record_gauge(
        "alerts.severity_score",
        f64::from(anomaly.severity.score()),
        &[("tenant", tenant_id), ("equipment", &anomaly.equipment_id)],
    );

    let threshold = anomaly.threshold.to_string();
    sink.record_gauge(
        &format!("anomaly.{}", metric_family(kind)),
        anomaly.value,
        &[
            ("tenant", tenant_id),
            ("equipment", &anomaly.equipment_id),
            ("threshold", &threshold),
        ],
    );
}

/// Collapse an anomaly kind to its metric family
fn metric_family(kind: &str) -> &'static str {
    if kind.contains("temperature") {
        "temperature"
    } else if kind.contains("vibration") {
        "vibration"
    } else if kind.contains("pressure") {
        "pressure"
    } else if kind.contains("power") {
        "power_consumption"
    } else {
        "other"
    }
}
