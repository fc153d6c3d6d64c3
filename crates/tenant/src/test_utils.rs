//! Shared fixtures for tenant-aware tests
//!
//! Used by this crate's unit tests and by downstream integration tests that
//! need a populated directory without a live control plane.

use chrono::{TimeZone, Utc};

use crate::context::{
    AlertConfig, DataConfig, DeploymentMode, FeatureConfig, ObjectConfig, TenantContext,
    TenantTier,
};
use crate::directory::StaticDirectory;

/// A shared-mode professional tenant
pub fn shared_tenant(id: &str) -> TenantContext {
    TenantContext {
        tenant_id: id.to_string(),
        name: format!("{id} Manufacturing"),
        deployment_mode: DeploymentMode::Shared,
        data_region: "us-east-1".into(),
        tier: TenantTier::Professional,
        compliance_tags: vec![],
        max_equipment: 500,
        retention_days: 30,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        data: DataConfig {
            connection_string: None,
            row_level_security: true,
            max_pool_connections: 20,
        },
        object: ObjectConfig::default(),
        alerts: AlertConfig {
            notification_topics: vec![format!("notify-{id}")],
            webhook_urls: vec![],
            escalation_rules: vec![],
        },
        features: FeatureConfig::default(),
    }
}

/// An isolated-mode enterprise tenant with dedicated resources
pub fn isolated_tenant(id: &str) -> TenantContext {
    let mut ctx = shared_tenant(id);
    ctx.deployment_mode = DeploymentMode::Isolated;
    ctx.tier = TenantTier::Enterprise;
    ctx.data.connection_string = Some(format!("postgres://ingest@{id}-hot.internal/telemetry"));
    ctx.data.row_level_security = false;
    ctx.data.max_pool_connections = 100;
    ctx.object.dedicated_bucket = Some(format!("{id}-telemetry"));
    ctx
}

/// A directory pre-populated with one shared and one isolated tenant
pub fn fixture_directory() -> StaticDirectory {
    let mut dir = StaticDirectory::new();
    dir.insert(shared_tenant("acme-corp"));
    dir.insert(isolated_tenant("globex"));
    dir
}
