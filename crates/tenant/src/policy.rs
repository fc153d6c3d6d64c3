//! Per-tenant access policy
//!
//! Two checks run after a context is loaded: a compliance check (region
//! pinning for tenants tagged `region-restricted`) and a request-rate check
//! against the tenant's hourly API limit. Either failure denies the request.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::context::TenantContext;
use crate::error::{Result, TenantError};

/// Compliance tag that pins a tenant to its home region
pub const REGION_RESTRICTED_TAG: &str = "region-restricted";

const HOUR: Duration = Duration::from_secs(3600);

/// Fixed-window hourly counter for one tenant
struct HourWindow {
    started_at: Instant,
    count: u32,
}

impl HourWindow {
    fn new() -> Self {
        Self {
            started_at: Instant::now(),
            count: 0,
        }
    }

    /// Count one request, rolling the window when the hour has passed
    fn tick(&mut self, limit: u32) -> bool {
        if self.started_at.elapsed() >= HOUR {
            self.started_at = Instant::now();
            self.count = 0;
        }
        if self.count >= limit {
            return false;
        }
        self.count += 1;
        true
    }
}

/// Access policy enforcement shared across request handlers
pub struct AccessPolicy {
    /// Region this process serves from
    process_region: String,
    windows: Mutex<HashMap<String, HourWindow>>,
}

impl AccessPolicy {
    /// Create a policy for the given serving region
    pub fn new(process_region: impl Into<String>) -> Self {
        Self {
            process_region: process_region.into(),
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Validate a request against the tenant's policy
    ///
    /// `source_region` is the region the request entered through when the
    /// edge reports one; otherwise the process region stands in.
    pub fn check(&self, ctx: &TenantContext, source_region: Option<&str>) -> Result<()> {
        self.check_compliance(ctx, source_region)?;
        self.check_rate(ctx)
    }

    fn check_compliance(&self, ctx: &TenantContext, source_region: Option<&str>) -> Result<()> {
        if !ctx.has_compliance_tag(REGION_RESTRICTED_TAG) {
            return Ok(());
        }

        let effective = source_region.unwrap_or(&self.process_region);
        if effective.eq_ignore_ascii_case(&ctx.data_region) {
            Ok(())
        } else {
            tracing::warn!(
                tenant_id = %ctx.tenant_id,
                request_region = %effective,
                data_region = %ctx.data_region,
                "region-restricted tenant accessed from foreign region"
            );
            Err(TenantError::denied(format!(
                "tenant is restricted to region {}",
                ctx.data_region
            )))
        }
    }

    fn check_rate(&self, ctx: &TenantContext) -> Result<()> {
        let limit = ctx.features.api_rate_limit;
        let mut windows = self.windows.lock();
        let window = windows
            .entry(ctx.tenant_id.clone())
            .or_insert_with(HourWindow::new);

        if window.tick(limit) {
            Ok(())
        } else {
            tracing::warn!(
                tenant_id = %ctx.tenant_id,
                limit,
                "hourly API rate limit exhausted"
            );
            Err(TenantError::denied("hourly request limit exceeded"))
        }
    }

    /// Drop idle windows (call periodically)
    pub fn cleanup(&self) {
        let mut windows = self.windows.lock();
        windows.retain(|_, w| w.started_at.elapsed() < HOUR * 2);
    }
}

#[cfg(test)]
#[path = "policy_test.rs"]
mod policy_test;
