//! Task execution status and results

use chrono::{DateTime, Utc};
use std::fmt;

/// Execution status as reported by DataSync
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Queued,
    Launching,
    Preparing,
    Transferring,
    Verifying,
    Cancelling,
    Success,
    Error,
    Unknown(String),
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ExecutionStatus::Queued => "QUEUED",
            ExecutionStatus::Launching => "LAUNCHING",
            ExecutionStatus::Preparing => "PREPARING",
            ExecutionStatus::Transferring => "TRANSFERRING",
            ExecutionStatus::Verifying => "VERIFYING",
            ExecutionStatus::Cancelling => "CANCELLING",
            ExecutionStatus::Success => "SUCCESS",
            ExecutionStatus::Error => "ERROR",
            ExecutionStatus::Unknown(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionStatus::Success | ExecutionStatus::Error)
    }
}

impl From<&str> for ExecutionStatus {
    fn from(value: &str) -> Self {
        match value {
            "QUEUED" => ExecutionStatus::Queued,
            "LAUNCHING" => ExecutionStatus::Launching,
            "PREPARING" => ExecutionStatus::Preparing,
            "TRANSFERRING" => ExecutionStatus::Transferring,
            "VERIFYING" => ExecutionStatus::Verifying,
            "CANCELLING" => ExecutionStatus::Cancelling,
            "SUCCESS" => ExecutionStatus::Success,
            "ERROR" => ExecutionStatus::Error,
            other => ExecutionStatus::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot returned by DescribeTaskExecution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionDescription {
    pub execution_arn: String,
    pub status: ExecutionStatus,
    pub files_transferred: i64,
    pub bytes_transferred: i64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub error_code: Option<String>,
    pub error_detail: Option<String>,
}

impl ExecutionDescription {
    pub fn new(execution_arn: impl Into<String>, status: ExecutionStatus) -> Self {
        Self {
            execution_arn: execution_arn.into(),
            status,
            files_transferred: 0,
            bytes_transferred: 0,
            start_time: None,
            end_time: None,
            error_code: None,
            error_detail: None,
        }
    }
}
