//! Selector tests
//!
//! Pools are created lazily, so these tests exercise selection logic
//! without a live store.

use std::sync::Arc;
use std::time::Duration;

use foundry_tenant::TenantTier;
use foundry_tenant::test_utils::{isolated_tenant, shared_tenant};

use super::{DataPlaneSelector, should_promote};
use crate::pool::PoolSet;
use crate::usage::{FixedUsageStats, NullUsageStats, TenantUsage, UsageStats};

fn pool_set() -> Arc<PoolSet> {
    Arc::new(
        PoolSet::new(
            "postgres://ingest@hot.internal/telemetry",
            30,
            Duration::from_millis(1000),
            "postgres://ingest@warm.internal/equipment",
            20,
            Duration::from_millis(2000),
            100,
        )
        .unwrap(),
    )
}

fn selector(usage: Arc<dyn UsageStats>) -> DataPlaneSelector {
    DataPlaneSelector::new(pool_set(), usage, "foundry-telemetry")
}

#[tokio::test]
async fn test_shared_tenant_plane() {
    let plane = selector(Arc::new(NullUsageStats))
        .select(&shared_tenant("acme-corp"))
        .unwrap();

    assert_eq!(plane.hot.tenant_scope(), Some("acme-corp"));
    assert_eq!(plane.warm.tenant_scope(), Some("acme-corp"));
    assert_eq!(plane.object.bucket, "foundry-telemetry");
    assert_eq!(plane.object.prefix, "tenants/acme-corp/");
    assert_eq!(plane.topics.sensor_data, "sensor-data-acme-corp");
    assert!(plane.topics.shared.is_some());
    assert_eq!(plane.alert_sinks.notification_topics, vec!["notify-acme-corp"]);
}

#[tokio::test]
async fn test_enterprise_isolated_tenant_gets_dedicated_pool() {
    let s = selector(Arc::new(NullUsageStats));
    let plane = s.select(&isolated_tenant("globex")).unwrap();

    // Enterprise tier promotes even with zero sampled usage
    assert_eq!(plane.hot.tenant_scope(), None);
    assert_eq!(plane.object.bucket, "globex-telemetry");
    assert!(plane.topics.shared.is_none());
}

#[tokio::test]
async fn test_low_volume_isolated_tenant_stays_on_shared_pool() {
    let mut ctx = isolated_tenant("globex");
    ctx.tier = TenantTier::Professional;

    let plane = selector(Arc::new(NullUsageStats)).select(&ctx).unwrap();

    // Still on the shared pool, so the session scope is mandatory
    assert_eq!(plane.hot.tenant_scope(), Some("globex"));
}

#[tokio::test]
async fn test_warm_tier_is_always_shared_and_scoped() {
    let plane = selector(Arc::new(NullUsageStats))
        .select(&isolated_tenant("globex"))
        .unwrap();
    assert_eq!(plane.warm.tenant_scope(), Some("globex"));
}

#[test]
fn test_promotion_matrix() {
    let mut ctx = isolated_tenant("globex");
    ctx.tier = TenantTier::Professional;

    let quiet = TenantUsage::default();
    assert!(!should_promote(&ctx, &quiet));

    let heavy_volume = TenantUsage {
        daily_volume_gb: 120.0,
        ..Default::default()
    };
    assert!(should_promote(&ctx, &heavy_volume));

    let heavy_queries = TenantUsage {
        avg_queries_per_sec: 75.0,
        ..Default::default()
    };
    assert!(should_promote(&ctx, &heavy_queries));

    let degraded = TenantUsage {
        recent_sla_violations: 6,
        ..Default::default()
    };
    assert!(should_promote(&ctx, &degraded));

    ctx.tier = TenantTier::Enterprise;
    assert!(should_promote(&ctx, &quiet));
}

#[tokio::test]
async fn test_promoted_pool_is_created_once() {
    let usage = Arc::new(FixedUsageStats(TenantUsage {
        daily_volume_gb: 500.0,
        ..Default::default()
    }));
    let pools = pool_set();
    let s = DataPlaneSelector::new(Arc::clone(&pools), usage, "foundry-telemetry");

    let mut ctx = isolated_tenant("globex");
    ctx.tier = TenantTier::Professional;

    s.select(&ctx).unwrap();
    s.select(&ctx).unwrap();

    assert_eq!(pools.dedicated_count(), 1);
}
