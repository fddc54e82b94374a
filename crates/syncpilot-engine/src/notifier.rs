//! Completion notification
//!
//! Templates use `{placeholder}` names. Placeholders without a value are
//! left as written.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use syncpilot_aws::NotificationPublisher;
use syncpilot_core::models::{ExecutionDescription, ExecutionStatus};
use syncpilot_core::{NotificationConfig, RunConfig, SyncError, SyncResult};

const DEFAULT_SUCCESS_TEMPLATE: &str = include_str!("../templates/success.txt");
const DEFAULT_FAILURE_TEMPLATE: &str = include_str!("../templates/failure.txt");

const PLACEHOLDER_PATTERN: &str = r"\{([a-z_]+)\}";

/// Replace every `{name}` that has a value in `values`
pub fn render_template(template: &str, values: &HashMap<&str, String>) -> SyncResult<String> {
    let pattern = Regex::new(PLACEHOLDER_PATTERN)
        .map_err(|e| SyncError::Template(format!("invalid placeholder pattern: {}", e)))?;

    Ok(pattern
        .replace_all(template, |caps: &Captures| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned())
}

/// Values available to the templates
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationContext {
    pub task_arn: String,
    pub source: String,
    pub destination: String,
    pub execution: ExecutionDescription,
}

impl NotificationContext {
    pub fn succeeded(&self) -> bool {
        self.execution.status == ExecutionStatus::Success
    }

    fn values(&self) -> HashMap<&'static str, String> {
        let execution = &self.execution;
        let timestamp = |value: Option<chrono::DateTime<chrono::Utc>>| {
            value
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "unknown".to_string())
        };

        let mut values = HashMap::from([
            ("task_arn", self.task_arn.clone()),
            ("execution_arn", execution.execution_arn.clone()),
            ("source", self.source.clone()),
            ("destination", self.destination.clone()),
            ("status", execution.status.to_string()),
            ("files_transferred", execution.files_transferred.to_string()),
            ("bytes_transferred", execution.bytes_transferred.to_string()),
            ("start_time", timestamp(execution.start_time)),
            ("end_time", timestamp(execution.end_time)),
        ]);

        if !self.succeeded() {
            values.insert(
                "error_code",
                execution.error_code.clone().unwrap_or_else(|| "none".to_string()),
            );
            values.insert(
                "error_detail",
                execution
                    .error_detail
                    .clone()
                    .unwrap_or_else(|| "no detail reported".to_string()),
            );
        }

        values
    }
}

pub struct Notifier {
    publisher: Arc<dyn NotificationPublisher>,
    topic_arn: String,
    subject_prefix: Option<String>,
    success_template: String,
    failure_template: String,
}

impl Notifier {
    /// Build a notifier when the run has a topic.
    ///
    /// Template overrides are read here so that a bad path fails the run
    /// before any remote call.
    pub fn from_config(
        config: &RunConfig,
        publisher: Arc<dyn NotificationPublisher>,
    ) -> SyncResult<Option<Self>> {
        let Some(topic_arn) = config.topic_arn() else {
            return Ok(None);
        };
        let NotificationConfig {
            subject_prefix,
            success_template,
            failure_template,
            ..
        } = &config.notification;

        Ok(Some(Self {
            publisher,
            topic_arn: topic_arn.to_string(),
            subject_prefix: subject_prefix.clone(),
            success_template: load_template(success_template.as_deref(), DEFAULT_SUCCESS_TEMPLATE)?,
            failure_template: load_template(failure_template.as_deref(), DEFAULT_FAILURE_TEMPLATE)?,
        }))
    }

    pub fn topic_arn(&self) -> &str {
        &self.topic_arn
    }

    pub fn subject(&self, context: &NotificationContext) -> String {
        let subject = format!("DataSync execution {}", context.execution.status);
        match &self.subject_prefix {
            Some(prefix) => format!("{} {}", prefix, subject),
            None => subject,
        }
    }

    pub fn render(&self, context: &NotificationContext) -> SyncResult<String> {
        let template = if context.succeeded() {
            &self.success_template
        } else {
            &self.failure_template
        };
        render_template(template, &context.values())
    }

    /// Render and publish once. Returns the message ID.
    pub async fn notify(&self, context: &NotificationContext) -> SyncResult<String> {
        let subject = self.subject(context);
        let message = self.render(context)?;

        tracing::info!(
            topic_arn = %self.topic_arn,
            status = %context.execution.status,
            "Publishing notification"
        );
        self.publisher
            .publish(&self.topic_arn, &subject, &message)
            .await
    }
}

fn load_template(path: Option<&Path>, default: &str) -> SyncResult<String> {
    match path {
        None => Ok(default.to_string()),
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            SyncError::Template(format!("cannot read {}: {}", path.display(), e))
        }),
    }
}
