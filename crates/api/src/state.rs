//! Runtime state
//!
//! Every process-wide resource lives in one constructed [`Runtime`] value
//! passed to handlers through axum `State`. There are no global singletons:
//! initialization order is explicit in [`Runtime::build`], and tests
//! substitute fakes by constructing a different runtime.

use std::sync::Arc;
use std::time::Duration;

use foundry_alerts::{AlertDispatcher, ObservabilitySink, TracingSink};
use foundry_config::AppConfig;
use foundry_dataplane::{DataPlaneSelector, NullUsageStats, PoolSet, UsageStats};
use foundry_detect::{AnomalyDetector, Thresholds};
use foundry_storage::{ColdStore, FanoutPool, StorageFanout};
use foundry_stream::{CriticalQueue, DEFAULT_CRITICAL_QUEUE_SIZE, StreamPublisher, spawn_drain};
use foundry_tenant::{TenantDirectory, TenantResolver};
use tokio::task::JoinHandle;

use crate::metrics::IngestMetrics;

/// Shared application state
pub struct Runtime {
    pub config: AppConfig,
    pub resolver: TenantResolver,
    pub selector: DataPlaneSelector,
    pub detector: AnomalyDetector,
    pub dispatcher: AlertDispatcher,
    pub publisher: Arc<StreamPublisher>,
    pub fanout_pool: FanoutPool,
    pub cold: ColdStore,
    pub pools: Arc<PoolSet>,
    pub metrics: Arc<IngestMetrics>,
    pub observability: Arc<dyn ObservabilitySink>,
    critical_worker: JoinHandle<()>,
}

/// State handle handed to axum
pub type AppState = Arc<Runtime>;

/// Errors assembling the runtime
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    DataPlane(#[from] foundry_dataplane::DataPlaneError),
    #[error(transparent)]
    Stream(#[from] foundry_stream::StreamError),
}

impl Runtime {
    /// Assemble the full runtime from configuration
    ///
    /// Pools and the stream producer connect lazily, so this cannot block
    /// on unreachable infrastructure; schema initialization is the caller's
    /// next step (see the `serve` command).
    pub async fn build(
        config: AppConfig,
        directory: Arc<dyn TenantDirectory>,
    ) -> Result<Self, RuntimeError> {
        Self::build_with_usage(config, directory, Arc::new(NullUsageStats)).await
    }

    /// Assemble with a custom usage-stats backend
    pub async fn build_with_usage(
        config: AppConfig,
        directory: Arc<dyn TenantDirectory>,
        usage: Arc<dyn UsageStats>,
    ) -> Result<Self, RuntimeError> {
        let pools = Arc::new(PoolSet::new(
            &config.shared_hot_url(),
            config.hot_store.max_connections,
            Duration::from_millis(config.hot_store.acquire_timeout_ms),
            &config.warm_store.connection_url(),
            config.warm_store.max_connections,
            Duration::from_millis(config.warm_store.acquire_timeout_ms),
            foundry_config::DEDICATED_POOL_SIZE,
        )?);

        let selector = DataPlaneSelector::new(
            Arc::clone(&pools),
            usage,
            config.shared_object_bucket.clone(),
        );

        let resolver = TenantResolver::new(
            directory,
            config.platform_domain.clone(),
            config.region.clone(),
        );

        let publisher = Arc::new(StreamPublisher::new(
            &config.stream.brokers,
            config.stream.use_tls,
        )?);

        let (critical_queue, critical_rx) = CriticalQueue::new(DEFAULT_CRITICAL_QUEUE_SIZE);
        let critical_worker = spawn_drain(Arc::clone(&publisher), &critical_queue, critical_rx);

        let observability: Arc<dyn ObservabilitySink> = Arc::new(TracingSink);
        let dispatcher = AlertDispatcher::new(
            Arc::clone(&publisher),
            critical_queue,
            Arc::clone(&observability),
            config.dashboard_url.clone(),
        );

        let cold = match config.object_store_endpoint {
            Some(ref endpoint) => ColdStore::with_endpoint(&config.region, endpoint).await,
            None => ColdStore::new(&config.region).await,
        };

        let fanout = Arc::new(StorageFanout::new(cold.clone()));
        let fanout_pool = FanoutPool::spawn(
            fanout,
            foundry_storage::DEFAULT_WORKERS,
            foundry_storage::DEFAULT_QUEUE_SIZE,
        );

        Ok(Self {
            config,
            resolver,
            selector,
            detector: AnomalyDetector::new(Thresholds::default()),
            dispatcher,
            publisher,
            fanout_pool,
            cold,
            pools,
            metrics: Arc::new(IngestMetrics::new()),
            observability,
            critical_worker,
        })
    }

    /// Drain background work and release process resources
    ///
    /// Order matters: stop accepting fan-out jobs and drain them, let the
    /// critical worker finish its backlog, then flush the producer and
    /// close the pools.
    pub async fn shutdown(self) {
        self.fanout_pool.shutdown().await;

        // The dispatcher holds the critical queue's last sender; dropping
        // it lets the worker drain its backlog and exit
        drop(self.dispatcher);
        if let Err(e) = self.critical_worker.await {
            tracing::warn!(error = %e, "critical worker join failed");
        }

        self.publisher.disconnect(Duration::from_secs(5));
        self.pools.close().await;

        tracing::info!("runtime shut down");
    }
}
