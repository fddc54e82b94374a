//! Publisher that keeps every message in memory

use async_trait::async_trait;
use std::sync::Mutex;
use syncpilot_aws::NotificationPublisher;
use syncpilot_core::{SyncError, SyncResult};

#[derive(Debug, Clone, PartialEq)]
pub struct PublishedMessage {
    pub topic_arn: String,
    pub subject: String,
    pub message: String,
}

#[derive(Default)]
pub struct RecordingPublisher {
    messages: Mutex<Vec<PublishedMessage>>,
    fail: bool,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every publish fails with a remote error
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<PublishedMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationPublisher for RecordingPublisher {
    async fn publish(&self, topic_arn: &str, subject: &str, message: &str) -> SyncResult<String> {
        if self.fail {
            return Err(SyncError::Remote {
                operation: "Publish",
                message: "topic does not exist".to_string(),
            });
        }

        let mut messages = self.messages.lock().unwrap();
        messages.push(PublishedMessage {
            topic_arn: topic_arn.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        });
        Ok(format!("message-{}", messages.len()))
    }
}
