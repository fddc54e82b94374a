//! Task descriptors and task status

use serde::{Deserialize, Serialize};
use std::fmt;

use super::location::Tags;

/// Task options forwarded to DataSync. Values are the service's wire strings,
/// e.g. `verify_mode = "ONLY_FILES_TRANSFERRED"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskOptions {
    #[serde(default)]
    pub verify_mode: Option<String>,
    #[serde(default)]
    pub overwrite_mode: Option<String>,
    #[serde(default)]
    pub atime: Option<String>,
    #[serde(default)]
    pub mtime: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub gid: Option<String>,
    #[serde(default)]
    pub preserve_deleted_files: Option<String>,
    #[serde(default)]
    pub preserve_devices: Option<String>,
    #[serde(default)]
    pub posix_permissions: Option<String>,
    /// -1 for unlimited
    #[serde(default)]
    pub bytes_per_second: Option<i64>,
    #[serde(default)]
    pub task_queueing: Option<String>,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub transfer_mode: Option<String>,
    #[serde(default)]
    pub security_descriptor_copy_flags: Option<String>,
    #[serde(default)]
    pub object_tags: Option<String>,
}

impl TaskOptions {
    pub fn is_empty(&self) -> bool {
        self == &TaskOptions::default()
    }
}

fn default_filter_type() -> String {
    "SIMPLE_PATTERN".to_string()
}

/// Include or exclude filter, e.g. `value = "/tmp|/cache"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    #[serde(default = "default_filter_type")]
    pub filter_type: String,
    pub value: String,
}

/// Everything needed to create a task once both locations are resolved
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub source_location_arn: String,
    pub destination_location_arn: String,
    pub name: Option<String>,
    pub cloudwatch_log_group_arn: Option<String>,
    pub schedule: Option<String>,
    pub options: TaskOptions,
    pub excludes: Vec<FilterRule>,
    pub tags: Tags,
}

/// Fields sent when updating an existing task. Tags are not part of an update.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskUpdate {
    pub task_arn: String,
    pub name: Option<String>,
    pub cloudwatch_log_group_arn: Option<String>,
    pub schedule: Option<String>,
    pub options: TaskOptions,
    pub excludes: Vec<FilterRule>,
}

/// Task status as reported by DataSync
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Creating,
    Available,
    Queued,
    Running,
    Unavailable,
    Unknown(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Creating => "CREATING",
            TaskStatus::Available => "AVAILABLE",
            TaskStatus::Queued => "QUEUED",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Unavailable => "UNAVAILABLE",
            TaskStatus::Unknown(raw) => raw,
        }
    }

    /// An execution can be started (or enqueued)
    pub fn is_ready(&self) -> bool {
        matches!(self, TaskStatus::Available | TaskStatus::Queued)
    }

    /// Polling stops on these: ready, or the agent cannot run the task
    pub fn is_settled(&self) -> bool {
        self.is_ready() || *self == TaskStatus::Unavailable
    }
}

impl From<&str> for TaskStatus {
    fn from(value: &str) -> Self {
        match value {
            "CREATING" => TaskStatus::Creating,
            "AVAILABLE" => TaskStatus::Available,
            "QUEUED" => TaskStatus::Queued,
            "RUNNING" => TaskStatus::Running,
            "UNAVAILABLE" => TaskStatus::Unavailable,
            other => TaskStatus::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot returned by DescribeTask
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDescription {
    pub task_arn: String,
    pub status: TaskStatus,
    pub name: Option<String>,
    pub source_location_arn: Option<String>,
    pub destination_location_arn: Option<String>,
    pub error_code: Option<String>,
    pub error_detail: Option<String>,
}

impl TaskDescription {
    pub fn new(task_arn: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            task_arn: task_arn.into(),
            status,
            name: None,
            source_location_arn: None,
            destination_location_arn: None,
            error_code: None,
            error_detail: None,
        }
    }
}
