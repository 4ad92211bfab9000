//! Commit worker: long-polls the queue and processes each batch by group.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use seatgate_core::config::worker::WorkerConfig;
use seatgate_core::result::AppResult;
use seatgate_core::traits::queue::{MessageQueue, ReceiveOptions, ReceivedMessage};

use crate::backoff;
use crate::executor::{MessageExecutor, ProcessError};
use crate::heartbeat::{Heartbeat, PendingReceipts};

/// Upper bound on messages per receive.
const MAX_BATCH: u32 = 10;

/// Outcome counts for one received batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Messages received.
    pub received: usize,
    /// Messages processed and deleted.
    pub succeeded: usize,
    /// Messages moved to the dead-letter destination.
    pub poisoned: usize,
    /// Messages that failed and were scheduled for retry.
    pub retried: usize,
    /// Messages left untouched behind a failure in their group.
    pub deferred: usize,
}

impl BatchReport {
    fn absorb(&mut self, group: BatchReport) {
        self.succeeded += group.succeeded;
        self.poisoned += group.poisoned;
        self.retried += group.retried;
        self.deferred += group.deferred;
    }
}

/// Processes the messages of one group strictly in order.
#[derive(Debug, Clone)]
struct GroupProcessor {
    queue: Arc<dyn MessageQueue>,
    executor: Arc<MessageExecutor>,
    visibility: Duration,
    heartbeat_period: Duration,
    backoff_base: Duration,
    backoff_cap: Duration,
}

impl GroupProcessor {
    async fn run(self, group: String, messages: Vec<ReceivedMessage>) -> BatchReport {
        let mut report = BatchReport::default();
        let pending: PendingReceipts = Arc::new(Mutex::new(
            messages.iter().map(|m| m.receipt_handle.clone()).collect(),
        ));
        let heartbeat = Heartbeat::start(
            Arc::clone(&self.queue),
            Arc::clone(&pending),
            self.heartbeat_period,
            self.visibility,
        );

        let mut handled = Vec::new();
        let mut failure = None;
        let mut remaining = messages.into_iter();

        // Handled receipts stay pending until the batch delete below.
        for message in remaining.by_ref() {
            match self.executor.process(&message).await {
                Ok(()) => {
                    report.succeeded += 1;
                    handled.push(message.receipt_handle);
                }
                Err(ProcessError::Poison(reason)) => {
                    report.poisoned += 1;
                    forget(&pending, &message.receipt_handle).await;
                    error!(
                        group = %group,
                        message_id = %message.message_id,
                        receive_count = message.receive_count,
                        reason = %reason,
                        "Poison message, moving to dead-letter queue"
                    );
                    if let Err(e) = self.queue.dead_letter(&message, &reason).await {
                        error!(message_id = %message.message_id, error = %e, "Failed to dead-letter message");
                    }
                }
                Err(ProcessError::Retryable(reason)) => {
                    forget(&pending, &message.receipt_handle).await;
                    failure = Some((message, reason));
                    break;
                }
            }
        }
        report.deferred = remaining.count();
        // No renewal may land after the deletes or the retry visibility.
        heartbeat.stop().await;

        if !handled.is_empty() {
            if let Err(e) = self.queue.delete_batch(&handled).await {
                warn!(group = %group, error = %e, "Failed to delete processed messages");
            }
        }

        if let Some((message, reason)) = failure {
            report.retried += 1;
            let delay =
                backoff::retry_delay(message.receive_count, self.backoff_base, self.backoff_cap);
            warn!(
                group = %group,
                message_id = %message.message_id,
                receive_count = message.receive_count,
                retry_in_secs = delay.as_secs(),
                deferred = report.deferred,
                reason = %reason,
                "Message failed, scheduling retry"
            );
            if let Err(e) = self
                .queue
                .change_visibility(&message.receipt_handle, delay)
                .await
            {
                warn!(message_id = %message.message_id, error = %e, "Failed to set retry visibility");
            }
        }

        report
    }
}

/// Stop renewing a receipt that has left the group.
async fn forget(pending: &PendingReceipts, receipt: &str) {
    pending.lock().await.retain(|r| r != receipt);
}

/// Main commit worker that polls the queue until shut down.
#[derive(Debug)]
pub struct CommitWorker {
    queue: Arc<dyn MessageQueue>,
    groups: GroupProcessor,
    receive: ReceiveOptions,
    receive_error_backoff: Duration,
}

impl CommitWorker {
    /// Create a new worker.
    pub fn new(
        queue: Arc<dyn MessageQueue>,
        executor: Arc<MessageExecutor>,
        config: &WorkerConfig,
    ) -> Self {
        let visibility = Duration::from_secs(config.visibility_timeout_seconds);
        Self {
            groups: GroupProcessor {
                queue: Arc::clone(&queue),
                executor,
                visibility,
                heartbeat_period: visibility.mul_f64(config.heartbeat_ratio.clamp(0.05, 0.95)),
                backoff_base: Duration::from_secs(config.backoff_base_seconds),
                backoff_cap: Duration::from_secs(config.backoff_cap_seconds),
            },
            receive: ReceiveOptions {
                max_messages: config.batch_size.clamp(1, MAX_BATCH),
                wait: Duration::from_secs(config.wait_time_seconds),
                visibility_timeout: visibility,
            },
            receive_error_backoff: Duration::from_secs(config.receive_error_backoff_seconds),
            queue,
        }
    }

    /// Run until `shutdown` flips to `true` or its sender is dropped.
    ///
    /// A batch already received is processed to completion before exiting.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            batch_size = self.receive.max_messages,
            wait_secs = self.receive.wait.as_secs(),
            visibility_secs = self.receive.visibility_timeout.as_secs(),
            "Commit worker started"
        );

        while !*shutdown.borrow() {
            let received = tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                received = self.queue.receive(&self.receive) => received,
            };

            match received {
                Ok(batch) if batch.is_empty() => {}
                Ok(batch) => {
                    let report = self.process_batch(batch).await;
                    debug!(?report, "Batch processed");
                }
                Err(e) => {
                    error!(error = %e, "Failed to receive from commit queue");
                    tokio::select! {
                        _ = shutdown.changed() => {}
                        _ = tokio::time::sleep(self.receive_error_backoff) => {}
                    }
                }
            }
        }

        info!("Commit worker stopped");
    }

    /// Receive one batch and process it.
    pub async fn poll_once(&self) -> AppResult<BatchReport> {
        let batch = self.queue.receive(&self.receive).await?;
        Ok(self.process_batch(batch).await)
    }

    /// Partition a batch by group and process the groups concurrently.
    pub async fn process_batch(&self, batch: Vec<ReceivedMessage>) -> BatchReport {
        let mut report = BatchReport {
            received: batch.len(),
            ..BatchReport::default()
        };

        let mut groups: BTreeMap<String, Vec<ReceivedMessage>> = BTreeMap::new();
        for message in batch {
            groups
                .entry(message.group_id.clone())
                .or_default()
                .push(message);
        }

        let mut tasks = JoinSet::new();
        for (group, messages) in groups {
            let processor = self.groups.clone();
            tasks.spawn(processor.run(group, messages));
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(group) => report.absorb(group),
                Err(e) => error!(error = %e, "Group task failed"),
            }
        }

        report
    }
}
