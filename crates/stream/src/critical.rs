//! Bounded critical-alert queue
//!
//! Critical alerts are fire-and-forget on the ingestion path: the
//! dispatcher enqueues without blocking and a dedicated worker drains the
//! queue into the producer. A full queue fails the enqueue closed - that is
//! the only backpressure signal the ingestion path honors. Dropping every
//! sender closes the queue; the worker drains what remains and exits, which
//! is the shutdown path.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{Result, StreamError};
use crate::publisher::{MessageHeaders, StreamPublisher};

/// Default queue capacity
pub const DEFAULT_CRITICAL_QUEUE_SIZE: usize = 1024;

/// One message awaiting fire-and-forget delivery
#[derive(Debug)]
pub struct CriticalMessage {
    pub topic: String,
    pub key: String,
    pub payload: Vec<u8>,
    pub headers: MessageHeaders,
}

/// Enqueue half of the critical-alert queue
#[derive(Clone)]
pub struct CriticalQueue {
    tx: mpsc::Sender<CriticalMessage>,
    depth: Arc<AtomicUsize>,
}

impl CriticalQueue {
    /// Create a queue with the given capacity
    ///
    /// Returns the enqueue handle and the receiver to hand to
    /// [`spawn_drain`].
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<CriticalMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                tx,
                depth: Arc::new(AtomicUsize::new(0)),
            },
            rx,
        )
    }

    /// Enqueue without blocking; fails closed when the queue is full
    pub fn try_enqueue(&self, message: CriticalMessage) -> Result<()> {
        match self.tx.try_send(message) {
            Ok(()) => {
                self.depth.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(m)) => {
                tracing::warn!(
                    topic = %m.topic,
                    key = %m.key,
                    "critical queue full, alert dropped"
                );
                Err(StreamError::QueueFull)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(StreamError::QueueClosed),
        }
    }

    /// Messages currently enqueued and not yet drained
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }

    fn depth_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.depth)
    }
}

/// Spawn the worker that drains the queue into the producer
///
/// The worker runs until every [`CriticalQueue`] clone is dropped, then
/// drains the backlog and exits. Delivery failures are logged and absorbed;
/// the stream topic is best-effort from the worker's perspective and the
/// producer's own buffer provides the durability window.
pub fn spawn_drain(
    publisher: Arc<StreamPublisher>,
    queue: &CriticalQueue,
    mut rx: mpsc::Receiver<CriticalMessage>,
) -> JoinHandle<()> {
    let depth = queue.depth_counter();

    tokio::spawn(async move {
        tracing::debug!("critical alert worker starting");

        while let Some(message) = rx.recv().await {
            depth.fetch_sub(1, Ordering::Relaxed);

            if let Err(e) = publisher
                .publish(&message.topic, &message.key, &message.payload, &message.headers)
                .await
            {
                tracing::error!(
                    topic = %message.topic,
                    key = %message.key,
                    error = %e,
                    "critical alert delivery failed"
                );
            }
        }

        tracing::debug!("critical alert worker stopping");
    })
}

#[cfg(test)]
#[path = "critical_test.rs"]
mod critical_test;
