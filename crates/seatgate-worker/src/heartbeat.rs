//! Visibility heartbeat for a group of in-flight messages.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use seatgate_core::traits::queue::MessageQueue;

/// Shortest renewal period the heartbeat will use.
const MIN_PERIOD: Duration = Duration::from_millis(10);

/// Receipt handles still owned by a group.
pub type PendingReceipts = Arc<Mutex<Vec<String>>>;

/// Renews the visibility of pending messages until dropped.
#[derive(Debug)]
pub struct Heartbeat {
    handle: JoinHandle<()>,
}

impl Heartbeat {
    /// Start renewing every `period`, extending each pending message by
    /// `extend_to`.
    pub fn start(
        queue: Arc<dyn MessageQueue>,
        pending: PendingReceipts,
        period: Duration,
        extend_to: Duration,
    ) -> Self {
        let period = period.max(MIN_PERIOD);
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let receipts = pending.lock().await.clone();
                for receipt in &receipts {
                    if let Err(e) = queue.change_visibility(receipt, extend_to).await {
                        warn!(error = %e, "Failed to extend message visibility");
                    }
                }
                debug!(renewed = receipts.len(), "Visibility heartbeat");
            }
        });
        Self { handle }
    }

    /// Abort the renewal task and wait until it has fully stopped.
    pub async fn stop(mut self) {
        self.handle.abort();
        if let Err(e) = (&mut self.handle).await {
            if !e.is_cancelled() {
                warn!(error = %e, "Visibility heartbeat ended abnormally");
            }
        }
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatgate_core::traits::queue::{OutboundMessage, ReceiveOptions};
    use seatgate_queue::MemoryQueue;

    fn options(visibility: Duration) -> ReceiveOptions {
        ReceiveOptions {
            max_messages: 10,
            wait: Duration::ZERO,
            visibility_timeout: visibility,
        }
    }

    async fn queue_with_one() -> Arc<MemoryQueue> {
        let queue = Arc::new(MemoryQueue::new(Duration::from_secs(300), 0));
        queue
            .send(OutboundMessage {
                body: "{}".into(),
                group_id: "g-1".into(),
                dedup_id: "d-1".into(),
            })
            .await
            .unwrap();
        queue
    }

    #[tokio::test(start_paused = true)]
    async fn test_keeps_messages_invisible_while_alive() {
        let queue = queue_with_one().await;
        let batch = queue.receive(&options(Duration::from_secs(10))).await.unwrap();
        let pending: PendingReceipts =
            Arc::new(Mutex::new(vec![batch[0].receipt_handle.clone()]));

        let heartbeat = Heartbeat::start(
            queue.clone(),
            pending,
            Duration::from_secs(6),
            Duration::from_secs(10),
        );
        time::sleep(Duration::from_secs(25)).await;
        assert!(queue.receive(&options(Duration::from_secs(10))).await.unwrap().is_empty());

        drop(heartbeat);
        time::sleep(Duration::from_secs(11)).await;
        assert_eq!(queue.receive(&options(Duration::from_secs(10))).await.unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_renewals() {
        let queue = queue_with_one().await;
        let batch = queue.receive(&options(Duration::from_secs(10))).await.unwrap();
        let pending: PendingReceipts =
            Arc::new(Mutex::new(vec![batch[0].receipt_handle.clone()]));

        let heartbeat = Heartbeat::start(
            queue.clone(),
            pending,
            Duration::from_secs(6),
            Duration::from_secs(10),
        );
        time::sleep(Duration::from_secs(7)).await;
        heartbeat.stop().await;

        // Last renewal at 6s, so the message is back at 16s. A live
        // heartbeat would have pushed it to 28s.
        time::sleep(Duration::from_secs(13)).await;
        assert_eq!(queue.receive(&options(Duration::from_secs(10))).await.unwrap().len(), 1);
    }
}
