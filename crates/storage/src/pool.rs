//! Background fan-out pool
//!
//! The HTTP response never waits on storage: handlers submit a job and
//! return. The pool bounds in-flight fan-out work with a fixed worker count
//! and a bounded queue - a full queue drops the job (counted and logged)
//! rather than growing without limit. Every job carries the originating
//! request id so tier logs correlate back to the request. On shutdown the
//! queue closes and workers drain the backlog before exiting.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use foundry_dataplane::DataPlane;
use foundry_detect::SensorReading;
use foundry_tenant::TenantContext;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::fanout::StorageFanout;
use crate::metrics::FanoutMetrics;

/// Default bound on queued fan-out jobs
pub const DEFAULT_QUEUE_SIZE: usize = 2048;

/// Default worker count
pub const DEFAULT_WORKERS: usize = 8;

/// One queued persistence job
pub struct FanoutJob {
    pub reading: SensorReading,
    pub ctx: Arc<TenantContext>,
    pub plane: DataPlane,
    /// Originating request id for log correlation
    pub request_id: String,
}

/// Bounded background pool executing storage fan-outs
pub struct FanoutPool {
    tx: mpsc::Sender<FanoutJob>,
    depth: Arc<AtomicUsize>,
    metrics: Arc<FanoutMetrics>,
    workers: Vec<JoinHandle<()>>,
}

impl FanoutPool {
    /// Spawn the pool with the given worker count and queue bound
    pub fn spawn(fanout: Arc<StorageFanout>, workers: usize, queue_size: usize) -> Self {
        let (tx, rx) = mpsc::channel::<FanoutJob>(queue_size);
        let rx = Arc::new(Mutex::new(rx));
        let depth = Arc::new(AtomicUsize::new(0));
        let metrics = fanout.metrics();

        let handles = (0..workers.max(1))
            .map(|worker_id| {
                let fanout = Arc::clone(&fanout);
                let rx = Arc::clone(&rx);
                let depth = Arc::clone(&depth);

                tokio::spawn(async move {
                    tracing::debug!(worker_id, "fan-out worker starting");

                    loop {
                        let job = { rx.lock().await.recv().await };
                        let Some(job) = job else { break };
                        depth.fetch_sub(1, Ordering::Relaxed);

                        let outcome = fanout.store(&job.reading, &job.ctx, &job.plane).await;

                        tracing::info!(
                            request_id = %job.request_id,
                            tenant_id = %job.ctx.tenant_id,
                            equipment_id = %job.reading.equipment_id,
                            hot_ok = outcome.hot_ok,
                            warm_ok = outcome.warm_ok,
                            cold_ok = outcome.cold_ok,
                            error_archived = outcome.error_archived,
                            latency_ms = outcome.latency_ms,
                            "storage fan-out finished"
                        );
                    }

                    tracing::debug!(worker_id, "fan-out worker stopping");
                })
            })
            .collect();

        Self {
            tx,
            depth,
            metrics,
            workers: handles,
        }
    }

    /// Submit a job without blocking
    ///
    /// Returns false when the queue is full or closed; the drop is counted.
    pub fn try_submit(&self, job: FanoutJob) -> bool {
        match self.tx.try_send(job) {
            Ok(()) => {
                self.depth.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(mpsc::error::TrySendError::Full(job)) => {
                self.metrics.job_dropped();
                tracing::error!(
                    request_id = %job.request_id,
                    equipment_id = %job.reading.equipment_id,
                    "fan-out queue full, reading not persisted"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(job)) => {
                self.metrics.job_dropped();
                tracing::error!(
                    request_id = %job.request_id,
                    "fan-out pool closed, reading not persisted"
                );
                false
            }
        }
    }

    /// Jobs queued and not yet picked up
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }

    /// Close the queue and wait for workers to drain the backlog
    pub async fn shutdown(self) {
        drop(self.tx);
        for handle in self.workers {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "fan-out worker join failed");
            }
        }
        tracing::info!("fan-out pool drained");
    }
}
