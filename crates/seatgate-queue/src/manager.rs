//! Queue manager that dispatches to the configured backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use seatgate_core::config::queue::QueueConfig;
use seatgate_core::error::AppError;
use seatgate_core::result::AppResult;
use seatgate_core::traits::queue::{
    MessageQueue, OutboundMessage, ReceiveOptions, ReceivedMessage,
};

/// Wraps the queue selected by configuration.
#[derive(Debug, Clone)]
pub struct QueueManager {
    inner: Arc<dyn MessageQueue>,
}

impl QueueManager {
    /// Create a queue from configuration.
    pub async fn new(config: &QueueConfig) -> AppResult<Self> {
        let inner: Arc<dyn MessageQueue> = match config.provider.as_str() {
            #[cfg(feature = "sqs")]
            "sqs" => {
                info!("Initializing SQS FIFO queue");
                Arc::new(crate::sqs::SqsQueue::connect(&config.sqs).await?)
            }
            "memory" => {
                info!(
                    dedup_window_seconds = config.dedup_window_seconds,
                    max_receive_count = config.max_receive_count,
                    "Initializing in-memory FIFO queue"
                );
                Arc::new(crate::memory::MemoryQueue::new(
                    Duration::from_secs(config.dedup_window_seconds),
                    config.max_receive_count,
                ))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown queue provider: '{other}'. Supported: memory, sqs"
                )));
            }
        };
        Ok(Self { inner })
    }

    /// Wrap an existing queue (for testing).
    pub fn from_queue(queue: Arc<dyn MessageQueue>) -> Self {
        Self { inner: queue }
    }

    /// Get a shared handle to the inner queue.
    pub fn queue(&self) -> Arc<dyn MessageQueue> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl MessageQueue for QueueManager {
    async fn send(&self, message: OutboundMessage) -> AppResult<String> {
        self.inner.send(message).await
    }

    async fn receive(&self, options: &ReceiveOptions) -> AppResult<Vec<ReceivedMessage>> {
        self.inner.receive(options).await
    }

    async fn delete_batch(&self, receipt_handles: &[String]) -> AppResult<()> {
        self.inner.delete_batch(receipt_handles).await
    }

    async fn change_visibility(&self, receipt_handle: &str, timeout: Duration) -> AppResult<()> {
        self.inner.change_visibility(receipt_handle, timeout).await
    }

    async fn dead_letter(&self, message: &ReceivedMessage, reason: &str) -> AppResult<()> {
        self.inner.dead_letter(message, reason).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
