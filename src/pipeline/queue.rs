//! Bounded in-process review queue.
//!
//! Backed by a `tokio::sync::mpsc` channel. Enqueueing never blocks: a full
//! queue rejects the task immediately and leaves the queue unchanged. Depth
//! is tracked with an atomic counter since the channel exposes no length.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::error::{GavelError, Result};
use crate::host::GerritEvent;

/// One unit of work for the background processor
#[derive(Debug, Clone)]
pub struct ReviewTask {
    pub event: GerritEvent,
    pub received_at: DateTime<Utc>,
}

impl ReviewTask {
    pub fn new(event: GerritEvent) -> Self {
        Self {
            event,
            received_at: Utc::now(),
        }
    }
}

/// Create a bounded queue, returning the producer and consumer halves
pub fn review_queue(capacity: usize) -> (ReviewQueue, ReviewReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    let depth = Arc::new(AtomicUsize::new(0));
    (
        ReviewQueue {
            tx,
            depth: Arc::clone(&depth),
            capacity,
        },
        ReviewReceiver { rx, depth },
    )
}

/// Producer half, cheap to clone into HTTP handlers
#[derive(Debug, Clone)]
pub struct ReviewQueue {
    tx: mpsc::Sender<ReviewTask>,
    depth: Arc<AtomicUsize>,
    capacity: usize,
}

impl ReviewQueue {
    /// Enqueue a task without blocking.
    ///
    /// Returns the queue depth observed after the insert. A full queue
    /// rejects with `QueueFull` and the task is dropped.
    pub fn enqueue(&self, task: ReviewTask) -> Result<usize> {
        match self.tx.try_send(task) {
            Ok(()) => Ok(self.depth.fetch_add(1, Ordering::SeqCst) + 1),
            Err(mpsc::error::TrySendError::Full(_)) => Err(GavelError::QueueFull {
                capacity: self.capacity,
            }),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(GavelError::validation("review queue is shut down"))
            }
        }
    }

    /// Number of tasks currently waiting
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Consumer half, owned by the background processor
#[derive(Debug)]
pub struct ReviewReceiver {
    rx: mpsc::Receiver<ReviewTask>,
    depth: Arc<AtomicUsize>,
}

impl ReviewReceiver {
    /// Receive the next task, `None` once all producers are gone
    pub async fn recv(&mut self) -> Option<ReviewTask> {
        let task = self.rx.recv().await;
        if task.is_some() {
            self.depth.fetch_sub(1, Ordering::SeqCst);
        }
        task
    }
}
