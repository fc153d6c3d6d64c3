//! Tenant context types
//!
//! The routing and policy record every request resolves to. Contexts are
//! loaded from the directory, validated against the deployment-mode
//! invariants, and cached; callers only ever see read-only `Arc` views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TenantError};

/// How a tenant's data-plane resources are provisioned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// Dedicated data-plane resources
    Isolated,
    /// Pooled resources, isolation via row-level security
    Shared,
    /// Dedicated for some resources, pooled for the rest
    Mixed,
}

/// Commercial tier, one input to dedicated-pool promotion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantTier {
    Basic,
    Professional,
    Enterprise,
}

/// Hot/warm store settings for a tenant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Dedicated connection string (isolated mode only)
    pub connection_string: Option<String>,

    /// Whether row-level security applies (true iff shared mode)
    pub row_level_security: bool,

    /// Pool ceiling for a dedicated pool
    pub max_pool_connections: u32,
}

/// Cold-tier settings for a tenant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectConfig {
    /// Dedicated bucket (isolated mode only)
    pub dedicated_bucket: Option<String>,

    /// Reference to a customer-managed encryption key
    pub encryption_key: Option<String>,

    /// Retention policy label applied to archived objects
    pub retention_policy: String,
}

/// Notification routing for a tenant's alerts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Notification topic identifiers
    pub notification_topics: Vec<String>,

    /// Webhook URLs receiving alert payloads
    pub webhook_urls: Vec<String>,

    /// Escalation schedule by severity
    pub escalation_rules: Vec<EscalationRule>,
}

/// Severity to escalation schedule mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationRule {
    /// Severity this rule applies to (`low` .. `critical`)
    pub severity: String,

    /// Minutes to wait before escalating
    pub delay_minutes: u32,

    /// Channels to escalate through
    pub channels: Vec<String>,
}

/// Feature flags and usage ceilings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Advanced analytics enabled
    pub advanced_analytics: bool,

    /// Custom dashboards enabled
    pub custom_dashboards: bool,

    /// Requests per tenant per hour
    pub api_rate_limit: u32,

    /// Concurrent interactive users allowed
    pub max_concurrent_users: u32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            advanced_analytics: false,
            custom_dashboards: false,
            api_rate_limit: 10_000,
            max_concurrent_users: 25,
        }
    }
}

/// The routing and policy record for one tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantContext {
    /// Stable tenant identifier
    pub tenant_id: String,

    /// Display name
    pub name: String,

    /// Resource provisioning mode
    pub deployment_mode: DeploymentMode,

    /// Home data region
    pub data_region: String,

    /// Commercial tier
    pub tier: TenantTier,

    /// Compliance tags (`region-restricted`, `soc2`, ...)
    #[serde(default)]
    pub compliance_tags: Vec<String>,

    /// Equipment registration ceiling
    pub max_equipment: u32,

    /// Hot-tier retention in days
    pub retention_days: u32,

    /// Directory record creation time
    pub created_at: DateTime<Utc>,

    /// Hot/warm store settings
    #[serde(default)]
    pub data: DataConfig,

    /// Cold-tier settings
    #[serde(default)]
    pub object: ObjectConfig,

    /// Notification routing
    #[serde(default)]
    pub alerts: AlertConfig,

    /// Feature flags and ceilings
    #[serde(default)]
    pub features: FeatureConfig,
}

impl TenantContext {
    /// Validate the deployment-mode invariants
    ///
    /// Shared mode forbids a dedicated connection string and requires
    /// row-level security; isolated mode requires the dedicated string.
    pub fn validate(&self) -> Result<()> {
        match self.deployment_mode {
            DeploymentMode::Shared => {
                if self.data.connection_string.is_some() {
                    return Err(TenantError::invalid_record(
                        &self.tenant_id,
                        "shared mode must not carry a dedicated connection string",
                    ));
                }
                if !self.data.row_level_security {
                    return Err(TenantError::invalid_record(
                        &self.tenant_id,
                        "shared mode requires row-level security",
                    ));
                }
            }
            DeploymentMode::Isolated => {
                if self.data.connection_string.is_none() {
                    return Err(TenantError::invalid_record(
                        &self.tenant_id,
                        "isolated mode requires a dedicated connection string",
                    ));
                }
            }
            DeploymentMode::Mixed => {}
        }
        Ok(())
    }

    /// Whether a compliance tag is present (case-insensitive)
    pub fn has_compliance_tag(&self, tag: &str) -> bool {
        self.compliance_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::shared_tenant;

    #[test]
    fn test_shared_invariant_rejects_dedicated_string() {
        let mut ctx = shared_tenant("acme-corp");
        assert!(ctx.validate().is_ok());

        ctx.data.connection_string = Some("postgres://dedicated/acme".into());
        assert!(ctx.validate().is_err());
    }

    #[test]
    fn test_shared_invariant_requires_rls() {
        let mut ctx = shared_tenant("acme-corp");
        ctx.data.row_level_security = false;
        assert!(ctx.validate().is_err());
    }

    #[test]
    fn test_isolated_invariant_requires_dedicated_string() {
        let mut ctx = shared_tenant("globex");
        ctx.deployment_mode = DeploymentMode::Isolated;
        assert!(ctx.validate().is_err());

        ctx.data.connection_string = Some("postgres://dedicated/globex".into());
        assert!(ctx.validate().is_ok());
    }

    #[test]
    fn test_compliance_tag_case_insensitive() {
        let mut ctx = shared_tenant("acme-corp");
        ctx.compliance_tags = vec!["Region-Restricted".into()];
        assert!(ctx.has_compliance_tag("region-restricted"));
        assert!(!ctx.has_compliance_tag("soc2"));
    }
}
