//! Server startup
//!
//! Builds the runtime from environment configuration, initializes storage
//! schemas, and serves until interrupted. Shutdown drains background work
//! before the process exits.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use foundry_api::{Runtime, build_router};
use foundry_config::AppConfig;
use foundry_tenant::{StaticDirectory, TenantDirectory};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Arguments for `foundry serve`
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Listen address (overrides BIND_ADDR)
    #[arg(long)]
    pub bind: Option<String>,
}

/// Run the ingestion server
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = AppConfig::from_env().context("configuration")?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    config.log_summary();

    let directory = load_directory(&config)?;
    let bind_addr = config.bind_addr.clone();

    let runtime = Runtime::build(config, directory)
        .await
        .context("runtime assembly")?;

    // One-time schema, partitioning, and retention setup. An unreachable
    // store at boot is survivable: writes fail into the error archive
    // until the store returns.
    if let Err(e) = foundry_storage::init_schemas(
        &runtime.pools.shared_hot(),
        &runtime.pools.shared_warm(),
    )
    .await
    {
        error!(error = %e, "storage schema initialization failed, continuing degraded");
    }

    let state = Arc::new(runtime);
    let app = build_router(Arc::clone(&state));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "ingestion server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .context("server")?;

    // Handlers are gone once serve returns; drain background work
    match Arc::try_unwrap(state) {
        Ok(runtime) => runtime.shutdown().await,
        Err(_) => warn!("runtime still shared at shutdown, skipping drain"),
    }

    Ok(())
}

/// Seed the tenant directory
///
/// Production deployments point TENANTS_FILE at the control-plane export;
/// without one the directory starts empty and every request is rejected as
/// unknown, which is the safe default.
fn load_directory(config: &AppConfig) -> Result<Arc<dyn TenantDirectory>> {
    let directory = match config.tenants_file {
        Some(ref path) => {
            let dir = StaticDirectory::from_file(path)
                .with_context(|| format!("tenant seed '{path}'"))?;
            info!(path = %path, tenants = dir.len(), "tenant directory loaded");
            dir
        }
        None => {
            warn!("TENANTS_FILE not set, tenant directory is empty");
            StaticDirectory::new()
        }
    };

    Ok(Arc::new(directory))
}
