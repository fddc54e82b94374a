use async_trait::async_trait;
use aws_sdk_sns::Client as SnsClient;
use syncpilot_core::SyncResult;

use crate::error::{missing_field, remote_error};
use crate::traits::NotificationPublisher;

/// SNS topics allow at most 100 characters in a subject
pub const MAX_SUBJECT_LEN: usize = 100;

/// Notification publisher backed by Amazon SNS
#[derive(Clone)]
pub struct SnsPublisher {
    client: SnsClient,
}

impl SnsPublisher {
    pub fn new(client: SnsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotificationPublisher for SnsPublisher {
    async fn publish(&self, topic_arn: &str, subject: &str, message: &str) -> SyncResult<String> {
        let subject: String = subject.chars().take(MAX_SUBJECT_LEN).collect();

        let output = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .map_err(|e| remote_error("Publish", e))?;

        let message_id = output
            .message_id()
            .map(String::from)
            .ok_or_else(|| missing_field("Publish", "MessageId"))?;

        tracing::info!(topic_arn = %topic_arn, message_id = %message_id, "Notification published");
        Ok(message_id)
    }
}
