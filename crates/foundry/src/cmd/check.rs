//! Configuration check
//!
//! Loads the environment configuration and the tenant seed file, reports
//! what it finds, and exits non-zero on any problem. Used by deployment
//! pipelines before rolling a new environment.

use anyhow::{Context, Result};
use foundry_config::AppConfig;
use foundry_tenant::StaticDirectory;
use tracing::info;

/// Run `foundry check`
pub fn run() -> Result<()> {
    let config = AppConfig::from_env().context("configuration")?;
    config.log_summary();

    if let Some(ref path) = config.tenants_file {
        let dir = StaticDirectory::from_file(path)
            .with_context(|| format!("tenant seed '{path}'"))?;
        info!(path = %path, tenants = dir.len(), "tenant seed valid");
    }

    info!("configuration ok");
    Ok(())
}
