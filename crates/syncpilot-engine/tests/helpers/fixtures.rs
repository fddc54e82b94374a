//! Run configurations and execution snapshots

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use syncpilot_core::models::{ExecutionDescription, ExecutionStatus};
use syncpilot_core::RunConfig;
use syncpilot_engine::SyncRunner;

use super::mock_datasync::execution_arn;
use super::{ManualClock, MockDataSync, RecordingPublisher};

pub const TOPIC_ARN: &str = "arn:aws:sns:eu-west-1:123456789012:datasync-done";
pub const EXISTING_NFS_ARN: &str = "arn:aws:datasync:eu-west-1:123456789012:location/loc-nfs";
pub const EXISTING_SMB_ARN: &str = "arn:aws:datasync:eu-west-1:123456789012:location/loc-smb";

/// NFS share through one agent into an S3 bucket, with a notification topic
pub const NFS_TO_S3: &str = r#"
name = "nightly-export"
cloudwatch_log_group_arn = "arn:aws:logs:eu-west-1:123456789012:log-group:/aws/datasync"
sns_topic_arn = "arn:aws:sns:eu-west-1:123456789012:datasync-done"

[source]
type = "nfs"
hostname = "nfs.internal"
subdirectory = "/source/directory"
agent_arns = ["arn:aws:datasync:eu-west-1:123456789012:agent/agent-0001"]

[destination]
type = "s3"
arn = "arn:aws:s3:::my-bucket"
access_role_arn = "arn:aws:iam::123456789012:role/datasync"
subdirectory = "/target/directory"

[tags]
team = "data"
"#;

pub fn nfs_to_s3() -> RunConfig {
    RunConfig::from_toml_str(NFS_TO_S3).unwrap()
}

/// `NFS_TO_S3` with extra TOML appended
pub fn nfs_to_s3_with(extra: &str) -> RunConfig {
    RunConfig::from_toml_str(&format!("{}\n{}", NFS_TO_S3, extra)).unwrap()
}

/// Update of an existing task whose NFS source and SMB destination already exist
pub fn update_existing(task_arn: &str) -> RunConfig {
    RunConfig::from_toml_str(&format!(
        r#"
task_arn = "{task_arn}"
name = "renamed"

[source]
type = "nfs"
location_arn = "{EXISTING_NFS_ARN}"
subdirectory = "/new/source"

[destination]
type = "smb"
location_arn = "{EXISTING_SMB_ARN}"
user = "backup"

[options]
preserve_deleted_files = "REMOVE"

[tags]
ignored = "on-update"
"#
    ))
    .unwrap()
}

pub fn execution(status: ExecutionStatus, files: i64) -> ExecutionDescription {
    let mut execution = ExecutionDescription::new(execution_arn(), status);
    execution.files_transferred = files;
    execution.bytes_transferred = files * 1024;
    execution.start_time = Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 5).unwrap());
    execution
}

pub fn failed_execution(files: i64, detail: &str) -> ExecutionDescription {
    let mut execution = execution(ExecutionStatus::Error, files);
    execution.error_code = Some("VerificationFailure".to_string());
    execution.error_detail = Some(detail.to_string());
    execution
}

/// Runner wired to fresh doubles
pub struct Harness {
    pub datasync: Arc<MockDataSync>,
    pub publisher: Arc<RecordingPublisher>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new(datasync: MockDataSync) -> Self {
        Self {
            datasync: Arc::new(datasync),
            publisher: Arc::new(RecordingPublisher::new()),
            clock: Arc::new(ManualClock::new()),
        }
    }

    pub fn runner(&self) -> SyncRunner {
        SyncRunner::new(self.datasync.clone(), self.publisher.clone()).with_clock(self.clock.clone())
    }
}
