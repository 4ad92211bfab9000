//! In-memory FIFO queue with message groups.
//!
//! Models the delivery contract of a FIFO queue on the tokio clock:
//!
//! - messages of one group are handed out in send order, and a group is
//!   blocked while its oldest message is in flight or hidden
//! - a repeated dedup id inside the window is absorbed
//! - every delivery bumps the receive count and hides the message for the
//!   requested visibility timeout
//! - a message received `max_receive_count` times is redriven to the
//!   dead-letter list instead of being delivered again

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, warn};

use seatgate_core::error::AppError;
use seatgate_core::result::AppResult;
use seatgate_core::traits::queue::{
    MessageQueue, OutboundMessage, ReceiveOptions, ReceivedMessage,
};

/// A message moved out of the main queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLetter {
    /// The message as last delivered.
    pub message: ReceivedMessage,
    /// Why it was moved.
    pub reason: String,
}

#[derive(Debug)]
struct StoredMessage {
    message_id: String,
    body: String,
    group_id: String,
    receive_count: u32,
    visible_at: Instant,
    receipt_handle: Option<String>,
}

impl StoredMessage {
    fn snapshot(&self) -> ReceivedMessage {
        ReceivedMessage {
            message_id: self.message_id.clone(),
            receipt_handle: self.receipt_handle.clone().unwrap_or_default(),
            body: self.body.clone(),
            group_id: self.group_id.clone(),
            receive_count: self.receive_count,
        }
    }
}

#[derive(Debug, Default)]
struct QueueState {
    /// Pending and in-flight messages in send order.
    messages: Vec<StoredMessage>,
    /// Dedup id to (message id, window end).
    dedup: HashMap<String, (String, Instant)>,
    dead_letters: Vec<DeadLetter>,
    next_id: u64,
}

impl QueueState {
    fn position_by_receipt(&self, receipt_handle: &str) -> Option<usize> {
        self.messages
            .iter()
            .position(|m| m.receipt_handle.as_deref() == Some(receipt_handle))
    }

    /// Hand out up to `max` deliverable messages. Returns the batch and the
    /// earliest instant at which a hidden message becomes visible.
    fn take_batch(
        &mut self,
        now: Instant,
        max: usize,
        visibility: Duration,
        max_receive_count: u32,
    ) -> (Vec<ReceivedMessage>, Option<Instant>) {
        let mut batch = Vec::new();
        let mut blocked: HashSet<String> = HashSet::new();
        let mut redriven: Vec<String> = Vec::new();
        let mut next_wake: Option<Instant> = None;

        for msg in self.messages.iter_mut() {
            if batch.len() >= max {
                break;
            }
            if blocked.contains(&msg.group_id) {
                continue;
            }
            if msg.visible_at > now {
                blocked.insert(msg.group_id.clone());
                next_wake = Some(next_wake.map_or(msg.visible_at, |w| w.min(msg.visible_at)));
                continue;
            }
            if max_receive_count > 0 && msg.receive_count >= max_receive_count {
                redriven.push(msg.message_id.clone());
                continue;
            }

            msg.receive_count += 1;
            msg.receipt_handle = Some(format!("{}#{}", msg.message_id, msg.receive_count));
            msg.visible_at = now + visibility;
            batch.push(msg.snapshot());
        }

        if !redriven.is_empty() {
            let (dead, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut self.messages)
                .into_iter()
                .partition(|m| redriven.contains(&m.message_id));
            self.messages = alive;
            for msg in dead {
                warn!(
                    message_id = %msg.message_id,
                    group = %msg.group_id,
                    receive_count = msg.receive_count,
                    "Redriving message to dead-letter list"
                );
                self.dead_letters.push(DeadLetter {
                    message: msg.snapshot(),
                    reason: "max receive count exceeded".to_string(),
                });
            }
        }

        (batch, next_wake)
    }
}

/// In-memory FIFO queue.
#[derive(Debug, Clone)]
pub struct MemoryQueue {
    state: Arc<Mutex<QueueState>>,
    notify: Arc<Notify>,
    dedup_window: Duration,
    max_receive_count: u32,
}

impl MemoryQueue {
    /// Creates an empty queue.
    ///
    /// A `max_receive_count` of zero disables redrive.
    pub fn new(dedup_window: Duration, max_receive_count: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState::default())),
            notify: Arc::new(Notify::new()),
            dedup_window,
            max_receive_count,
        }
    }

    /// Messages moved to the dead-letter list so far.
    pub async fn dead_letters(&self) -> Vec<DeadLetter> {
        self.state.lock().await.dead_letters.clone()
    }

    /// Number of messages still in the queue, in flight or not.
    pub async fn depth(&self) -> usize {
        self.state.lock().await.messages.len()
    }
}

#[async_trait]
impl MessageQueue for MemoryQueue {
    async fn send(&self, message: OutboundMessage) -> AppResult<String> {
        let now = Instant::now();
        let mut state = self.state.lock().await;
        state.dedup.retain(|_, (_, until)| *until > now);

        if let Some((existing, _)) = state.dedup.get(&message.dedup_id) {
            debug!(
                dedup_id = %message.dedup_id,
                message_id = %existing,
                "Duplicate message absorbed"
            );
            return Ok(existing.clone());
        }

        state.next_id += 1;
        let message_id = format!("mem-{:08}", state.next_id);
        state.dedup.insert(
            message.dedup_id.clone(),
            (message_id.clone(), now + self.dedup_window),
        );
        state.messages.push(StoredMessage {
            message_id: message_id.clone(),
            body: message.body,
            group_id: message.group_id,
            receive_count: 0,
            visible_at: now,
            receipt_handle: None,
        });
        drop(state);

        self.notify.notify_waiters();
        Ok(message_id)
    }

    async fn receive(&self, options: &ReceiveOptions) -> AppResult<Vec<ReceivedMessage>> {
        let deadline = Instant::now() + options.wait;
        let max = options.max_messages.max(1) as usize;

        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let now = Instant::now();
            let (batch, next_wake) = self.state.lock().await.take_batch(
                now,
                max,
                options.visibility_timeout,
                self.max_receive_count,
            );
            if !batch.is_empty() || now >= deadline {
                return Ok(batch);
            }

            let wake = next_wake.map_or(deadline, |w| w.min(deadline));
            tokio::select! {
                _ = &mut notified => {}
                _ = sleep_until(wake) => {}
            }
        }
    }

    async fn delete_batch(&self, receipt_handles: &[String]) -> AppResult<()> {
        let mut state = self.state.lock().await;
        for handle in receipt_handles {
            match state.position_by_receipt(handle) {
                Some(pos) => {
                    state.messages.remove(pos);
                }
                None => debug!(receipt = %handle, "Delete of unknown receipt ignored"),
            }
        }
        drop(state);
        self.notify.notify_waiters();
        Ok(())
    }

    async fn change_visibility(&self, receipt_handle: &str, timeout: Duration) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let pos = state.position_by_receipt(receipt_handle).ok_or_else(|| {
            AppError::queue(format!("Receipt handle is no longer valid: {receipt_handle}"))
        })?;
        state.messages[pos].visible_at = Instant::now() + timeout;
        drop(state);
        self.notify.notify_waiters();
        Ok(())
    }

    async fn dead_letter(&self, message: &ReceivedMessage, reason: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(pos) = state.position_by_receipt(&message.receipt_handle) {
            state.messages.remove(pos);
        }
        error!(
            message_id = %message.message_id,
            group = %message.group_id,
            receive_count = message.receive_count,
            reason,
            "Message moved to dead-letter list"
        );
        state.dead_letters.push(DeadLetter {
            message: message.clone(),
            reason: reason.to_string(),
        });
        drop(state);
        self.notify.notify_waiters();
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
