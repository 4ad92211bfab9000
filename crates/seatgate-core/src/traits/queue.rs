//! Ordered dedup queue trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// A message to enqueue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Serialized message body.
    pub body: String,
    /// Ordering partition. Messages sharing a group are delivered in send order.
    pub group_id: String,
    /// Deduplication key. A repeat inside the dedup window is absorbed.
    pub dedup_id: String,
}

/// A message handed out by [`MessageQueue::receive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    /// Provider-assigned message id.
    pub message_id: String,
    /// Handle identifying this particular delivery.
    pub receipt_handle: String,
    /// Serialized message body.
    pub body: String,
    /// Ordering partition as reported by the queue.
    pub group_id: String,
    /// How many times this message has been handed out, including this one.
    pub receive_count: u32,
}

/// Parameters for a long-poll receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveOptions {
    /// Maximum number of messages to return.
    pub max_messages: u32,
    /// How long to wait for messages to arrive.
    pub wait: Duration,
    /// How long received messages stay hidden from other consumers.
    pub visibility_timeout: Duration,
}

/// Partitioned at-least-once queue with per-group ordering and dedup.
#[async_trait]
pub trait MessageQueue: Send + Sync + std::fmt::Debug + 'static {
    /// Enqueue a message. Returns the provider message id.
    async fn send(&self, message: OutboundMessage) -> AppResult<String>;

    /// Long-poll for up to `max_messages` messages.
    async fn receive(&self, options: &ReceiveOptions) -> AppResult<Vec<ReceivedMessage>>;

    /// Acknowledge and remove delivered messages.
    async fn delete_batch(&self, receipt_handles: &[String]) -> AppResult<()>;

    /// Hide a delivered message for `timeout` from now.
    async fn change_visibility(&self, receipt_handle: &str, timeout: Duration) -> AppResult<()>;

    /// Move a delivered message to the dead-letter destination.
    async fn dead_letter(&self, message: &ReceivedMessage, reason: &str) -> AppResult<()>;

    /// Check that the queue backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
