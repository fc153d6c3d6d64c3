//! Per-tenant stream topic names

use foundry_tenant::DeploymentMode;
use serde::Serialize;

/// Priority topic shared by every tenant's critical alerts
pub const PRIORITY_ALERT_TOPIC: &str = "manufacturing-alerts-priority";

/// Cross-tenant topic available to shared-mode tenants
pub const SHARED_TOPIC: &str = "manufacturing-shared";

/// The topics one request publishes to
#[derive(Debug, Clone, Serialize)]
pub struct StreamTopics {
    /// Per-tenant reading stream
    pub sensor_data: String,
    /// Per-tenant alert stream
    pub alerts: String,
    /// Platform-wide priority alert stream
    pub priority_alerts: String,
    /// Cross-tenant stream (shared mode only)
    pub shared: Option<String>,
}

impl StreamTopics {
    /// Derive the topic set for a tenant
    pub fn for_tenant(tenant_id: &str, mode: DeploymentMode) -> Self {
        Self {
            sensor_data: format!("sensor-data-{tenant_id}"),
            alerts: format!("alerts-{tenant_id}"),
            priority_alerts: PRIORITY_ALERT_TOPIC.to_string(),
            shared: match mode {
                DeploymentMode::Shared => Some(SHARED_TOPIC.to_string()),
                _ => None,
            },
        }
    }
}
