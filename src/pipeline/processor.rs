//! Background task processor.
//!
//! A single task drains the queue sequentially. Each iteration polls the
//! queue with a timeout so the shutdown flag is re-checked even when the
//! queue is quiet. Failed evaluations are logged and dropped, never
//! retried or requeued.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info};

use super::queue::ReviewReceiver;
use super::Evaluator;

/// Observable lifecycle state of the processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorState {
    Idle,
    Processing,
    Stopped,
}

/// Handle to a running background processor
pub struct ProcessorHandle {
    state: watch::Receiver<ProcessorState>,
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl ProcessorHandle {
    /// Current processor state
    pub fn state(&self) -> ProcessorState {
        *self.state.borrow()
    }

    /// Watch handle for observers such as the HTTP surface
    pub fn state_receiver(&self) -> watch::Receiver<ProcessorState> {
        self.state.clone()
    }

    /// Signal shutdown and wait for the processor to stop
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.join.await;
    }
}

/// Spawn the processor loop on the current runtime
pub fn spawn_processor(
    mut receiver: ReviewReceiver,
    evaluator: Arc<Evaluator>,
    poll_interval: Duration,
) -> ProcessorHandle {
    let (state_tx, state_rx) = watch::channel(ProcessorState::Idle);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let join = tokio::spawn(async move {
        info!("background review processor started");
        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            match timeout(poll_interval, receiver.recv()).await {
                Ok(Some(task)) => {
                    let _ = state_tx.send(ProcessorState::Processing);
                    let change = task.event.change.id.clone();
                    match evaluator.evaluate_task(&task).await {
                        Ok(review) => {
                            info!(
                                change = %change,
                                review = %review.review_metadata.review_id,
                                score = review.weighted_overall_score,
                                "review completed"
                            );
                        }
                        Err(e) => {
                            error!(change = %change, "review failed: {e}");
                        }
                    }
                    let _ = state_tx.send(ProcessorState::Idle);
                }
                // All producers dropped, nothing more will arrive
                Ok(None) => break,
                // Quiet interval, loop back to re-check shutdown
                Err(_) => {}
            }
        }
        let _ = state_tx.send(ProcessorState::Stopped);
        info!("background review processor stopped");
    });

    ProcessorHandle {
        state: state_rx,
        shutdown: shutdown_tx,
        join,
    }
}
