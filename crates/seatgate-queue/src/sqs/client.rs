//! SQS FIFO implementation of [`MessageQueue`].

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_sqs::Client;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::types::{
    DeleteMessageBatchRequestEntry, Message, MessageSystemAttributeName, QueueAttributeName,
};
use tracing::{error, info, warn};

use seatgate_core::config::queue::SqsQueueConfig;
use seatgate_core::error::AppError;
use seatgate_core::result::AppResult;
use seatgate_core::traits::queue::{
    MessageQueue, OutboundMessage, ReceiveOptions, ReceivedMessage,
};

/// Largest batch SQS accepts for receive and delete.
const MAX_BATCH: usize = 10;

/// SQS FIFO queue client.
#[derive(Debug, Clone)]
pub struct SqsQueue {
    client: Client,
    queue_url: String,
    dead_letter_url: Option<String>,
}

impl SqsQueue {
    /// Build an SQS client from the default AWS credential chain.
    pub async fn connect(config: &SqsQueueConfig) -> AppResult<Self> {
        if config.queue_url.is_empty() {
            return Err(AppError::configuration("queue.sqs.queue_url is required"));
        }

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        info!(
            queue_url = %config.queue_url,
            dead_letter = config.dead_letter_url.is_some(),
            "SQS queue client initialized"
        );

        Ok(Self {
            client: Client::new(&shared),
            queue_url: config.queue_url.clone(),
            dead_letter_url: config.dead_letter_url.clone(),
        })
    }

    fn map_err<E>(context: &str, e: E) -> AppError
    where
        E: std::error::Error,
    {
        AppError::queue(format!("{context}: {}", DisplayErrorContext(e)))
    }

    fn to_received(message: &Message) -> Option<ReceivedMessage> {
        let attributes = message.attributes();
        let attribute = |name: &MessageSystemAttributeName| {
            attributes.and_then(|a| a.get(name)).cloned()
        };

        Some(ReceivedMessage {
            message_id: message.message_id()?.to_string(),
            receipt_handle: message.receipt_handle()?.to_string(),
            body: message.body().unwrap_or_default().to_string(),
            group_id: attribute(&MessageSystemAttributeName::MessageGroupId).unwrap_or_default(),
            receive_count: attribute(&MessageSystemAttributeName::ApproximateReceiveCount)
                .and_then(|c| c.parse().ok())
                .unwrap_or(1),
        })
    }

    fn secs(duration: Duration) -> i32 {
        i32::try_from(duration.as_secs()).unwrap_or(i32::MAX)
    }
}

#[async_trait]
impl MessageQueue for SqsQueue {
    async fn send(&self, message: OutboundMessage) -> AppResult<String> {
        let output = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(message.body)
            .message_group_id(message.group_id)
            .message_deduplication_id(message.dedup_id)
            .send()
            .await
            .map_err(|e| Self::map_err("SQS SendMessage failed", e))?;
        Ok(output.message_id().unwrap_or_default().to_string())
    }

    async fn receive(&self, options: &ReceiveOptions) -> AppResult<Vec<ReceivedMessage>> {
        let max = (options.max_messages as usize).clamp(1, MAX_BATCH) as i32;
        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(max)
            .wait_time_seconds(Self::secs(options.wait))
            .visibility_timeout(Self::secs(options.visibility_timeout))
            .message_system_attribute_names(MessageSystemAttributeName::ApproximateReceiveCount)
            .message_system_attribute_names(MessageSystemAttributeName::MessageGroupId)
            .send()
            .await
            .map_err(|e| Self::map_err("SQS ReceiveMessage failed", e))?;

        Ok(output
            .messages()
            .iter()
            .filter_map(Self::to_received)
            .collect())
    }

    async fn delete_batch(&self, receipt_handles: &[String]) -> AppResult<()> {
        for chunk in receipt_handles.chunks(MAX_BATCH) {
            let entries = chunk
                .iter()
                .enumerate()
                .map(|(i, handle)| {
                    DeleteMessageBatchRequestEntry::builder()
                        .id(i.to_string())
                        .receipt_handle(handle)
                        .build()
                        .map_err(|e| Self::map_err("Invalid delete entry", e))
                })
                .collect::<AppResult<Vec<_>>>()?;

            let output = self
                .client
                .delete_message_batch()
                .queue_url(&self.queue_url)
                .set_entries(Some(entries))
                .send()
                .await
                .map_err(|e| Self::map_err("SQS DeleteMessageBatch failed", e))?;

            for failed in output.failed() {
                warn!(
                    entry = %failed.id(),
                    code = %failed.code(),
                    detail = failed.message().unwrap_or_default(),
                    "Message delete failed; it will be redelivered"
                );
            }
        }
        Ok(())
    }

    async fn change_visibility(&self, receipt_handle: &str, timeout: Duration) -> AppResult<()> {
        self.client
            .change_message_visibility()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .visibility_timeout(Self::secs(timeout))
            .send()
            .await
            .map_err(|e| Self::map_err("SQS ChangeMessageVisibility failed", e))?;
        Ok(())
    }

    async fn dead_letter(&self, message: &ReceivedMessage, reason: &str) -> AppResult<()> {
        match &self.dead_letter_url {
            Some(dlq) => {
                self.client
                    .send_message()
                    .queue_url(dlq)
                    .message_body(&message.body)
                    .message_group_id(&message.group_id)
                    .message_deduplication_id(format!("dlq-{}", message.message_id))
                    .send()
                    .await
                    .map_err(|e| Self::map_err("SQS dead-letter forward failed", e))?;
                error!(
                    message_id = %message.message_id,
                    group = %message.group_id,
                    receive_count = message.receive_count,
                    reason,
                    "Message forwarded to dead-letter queue"
                );
            }
            None => {
                error!(
                    message_id = %message.message_id,
                    group = %message.group_id,
                    receive_count = message.receive_count,
                    reason,
                    body = %message.body,
                    "No dead-letter queue configured; dropping poison message"
                );
            }
        }

        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(&message.receipt_handle)
            .send()
            .await
            .map_err(|e| Self::map_err("SQS DeleteMessage failed", e))?;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.client
            .get_queue_attributes()
            .queue_url(&self.queue_url)
            .attribute_names(QueueAttributeName::ApproximateNumberOfMessages)
            .send()
            .await
            .map_err(|e| Self::map_err("SQS GetQueueAttributes failed", e))?;
        Ok(true)
    }
}
