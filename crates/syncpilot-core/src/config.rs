//! Configuration module
//!
//! Two sources of configuration:
//! - [`RunConfig`]: the run file passed with `--config-file` (TOML or JSON),
//!   describing locations, task options, notification, polling and hooks.
//! - [`Settings`]: process settings read from `SYNCPILOT_*` environment
//!   variables (after loading `.env`), covering logging and AWS endpoints.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{SyncError, SyncResult};
use crate::models::{FilterRule, LocationDescriptor, Tags, TaskOptions};

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_LOG_FILE: &str = "output.log";

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

/// Polling behavior of the readiness and execution stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
    /// Upper bound on each polling stage. None waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            timeout_secs: None,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// SNS topic receiving the completion message
    #[serde(default)]
    pub topic_arn: Option<String>,
    #[serde(default)]
    pub subject_prefix: Option<String>,
    /// Template file overriding the built-in success message
    #[serde(default)]
    pub success_template: Option<PathBuf>,
    /// Template file overriding the built-in failure message
    #[serde(default)]
    pub failure_template: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Delete the locations created by this run once it has finished
    #[serde(default)]
    pub delete_created_locations: bool,
}

/// Shell commands run at each lifecycle stage. Exit status 0 lets the run continue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookCommands {
    #[serde(default)]
    pub before_task_configuration: Option<String>,
    #[serde(default)]
    pub before_task_execution: Option<String>,
    #[serde(default)]
    pub during_task_execution: Option<String>,
    #[serde(default)]
    pub after_task_execution: Option<String>,
}

impl HookCommands {
    pub fn is_empty(&self) -> bool {
        self == &HookCommands::default()
    }
}

/// The run file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Existing task to update. When absent or blank a new task is created.
    #[serde(default, deserialize_with = "crate::models::location::non_blank")]
    pub task_arn: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cloudwatch_log_group_arn: Option<String>,
    /// Schedule expression, e.g. `cron(0 12 ? * SUN,WED *)`
    #[serde(default)]
    pub schedule: Option<String>,
    /// Shorthand for `notification.topic_arn`
    #[serde(default)]
    pub sns_topic_arn: Option<String>,
    #[serde(default)]
    pub source: Option<LocationDescriptor>,
    #[serde(default)]
    pub destination: Option<LocationDescriptor>,
    #[serde(default)]
    pub options: TaskOptions,
    #[serde(default)]
    pub excludes: Vec<FilterRule>,
    /// Filters applied to the started execution only
    #[serde(default)]
    pub includes: Vec<FilterRule>,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub cleanup: CleanupConfig,
    #[serde(default)]
    pub hooks: HookCommands,
}

impl RunConfig {
    /// Load and validate a run file. `.json` files are parsed as JSON, anything else as TOML.
    /// Relative template paths are resolved against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> SyncResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SyncError::config(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }

        let raw = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let mut config = if is_json {
            Self::from_json_str(&raw)?
        } else {
            Self::from_toml_str(&raw)?
        };

        if let Some(base_dir) = path.parent() {
            config.resolve_paths(base_dir);
        }

        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> SyncResult<Self> {
        let config: RunConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> SyncResult<Self> {
        let config: RunConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SyncResult<()> {
        if self.polling.interval_secs == 0 {
            return Err(SyncError::config(
                "polling.interval_secs must be greater than zero",
            ));
        }

        if self.polling.timeout_secs == Some(0) {
            return Err(SyncError::config(
                "polling.timeout_secs must be greater than zero when set",
            ));
        }

        if self.task_arn.is_none() && (self.source.is_none() || self.destination.is_none()) {
            return Err(SyncError::config(
                "both source and destination locations must be configured to create a task",
            ));
        }

        for rule in self.excludes.iter().chain(self.includes.iter()) {
            if rule.value.trim().is_empty() {
                return Err(SyncError::config("filter rules must have a non-empty value"));
            }
        }

        Ok(())
    }

    /// Topic that receives the completion message, if any
    pub fn topic_arn(&self) -> Option<&str> {
        self.notification
            .topic_arn
            .as_deref()
            .or(self.sns_topic_arn.as_deref())
    }

    fn resolve_paths(&mut self, base_dir: &Path) {
        for template in [
            &mut self.notification.success_template,
            &mut self.notification.failure_template,
        ] {
            if let Some(path) = template.as_mut() {
                if path.is_relative() {
                    *path = base_dir.join(&*path);
                }
            }
        }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}

/// Process settings from `SYNCPILOT_*` environment variables
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_log_file")]
    pub log_file: String,
    /// Region override; otherwise the standard AWS resolution chain applies
    #[serde(default)]
    pub aws_region: Option<String>,
    /// Custom endpoint (e.g. LocalStack) for both DataSync and SNS
    #[serde(default)]
    pub aws_endpoint_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            log_file: default_log_file(),
            aws_region: None,
            aws_endpoint_url: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> SyncResult<Self> {
        dotenvy::dotenv().ok();
        let settings = envy::prefixed("SYNCPILOT_").from_env::<Settings>()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> SyncResult<()> {
        if self.log_file.trim().is_empty() {
            return Err(SyncError::config("SYNCPILOT_LOG_FILE must not be empty"));
        }
        Ok(())
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(&self.log_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LocationKind, LocationSpec};

    const NFS_TO_S3: &str = r#"
cloudwatch_log_group_arn = "arn:aws:logs:eu-west-1:123:log-group:/datasync"
sns_topic_arn = "arn:aws:sns:eu-west-1:123:sync-done"

[source]
type = "nfs"
hostname = "nfs.internal"
subdirectory = "/source/directory"
agent_arns = ["arn:aws:datasync:eu-west-1:123:agent/agent-1"]

[destination]
type = "s3"
arn = "arn:aws:s3:::my-bucket"
access_role_arn = "arn:aws:iam::123:role/datasync"
subdirectory = "/target/directory"
"#;

    #[test]
    fn test_parse_nfs_to_s3() {
        let config = RunConfig::from_toml_str(NFS_TO_S3).unwrap();
        assert_eq!(config.source.as_ref().unwrap().kind(), LocationKind::Nfs);
        assert_eq!(
            config.destination.as_ref().unwrap().kind(),
            LocationKind::S3
        );
        assert_eq!(config.topic_arn(), Some("arn:aws:sns:eu-west-1:123:sync-done"));
        assert_eq!(config.polling.interval_secs, DEFAULT_POLL_INTERVAL_SECS);
        assert!(config.polling.timeout().is_none());
        assert!(!config.cleanup.delete_created_locations);
    }

    #[test]
    fn test_notification_topic_takes_precedence() {
        let raw = format!(
            "{}\n[notification]\ntopic_arn = \"arn:aws:sns:eu-west-1:123:other\"\n",
            NFS_TO_S3
        );
        let config = RunConfig::from_toml_str(&raw).unwrap();
        assert_eq!(config.topic_arn(), Some("arn:aws:sns:eu-west-1:123:other"));
    }

    #[test]
    fn test_blank_task_arn_means_create() {
        let raw = format!("task_arn = \"\"\n{}", NFS_TO_S3);
        let config = RunConfig::from_toml_str(&raw).unwrap();
        assert!(config.task_arn.is_none());

        let config = RunConfig::from_json_str(
            r#"{"task_arn": " ", "source": {"type": "nfs", "location_arn": "", "hostname": "nfs.internal"},
                "destination": {"type": "s3", "arn": "arn:aws:s3:::my-bucket"}}"#,
        )
        .unwrap();
        assert!(config.task_arn.is_none());
        assert!(config.source.unwrap().location_arn.is_none());
    }

    #[test]
    fn test_create_requires_both_locations() {
        let raw = r#"
[source]
type = "nfs"
hostname = "nfs.internal"
"#;
        let err = RunConfig::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
        assert!(err.to_string().contains("source and destination"));
    }

    #[test]
    fn test_update_without_locations_is_valid() {
        let raw = r#"
task_arn = "arn:aws:datasync:eu-west-1:123:task/task-1"

[options]
preserve_deleted_files = "REMOVE"
"#;
        let config = RunConfig::from_toml_str(raw).unwrap();
        assert!(config.source.is_none());
        assert_eq!(
            config.options.preserve_deleted_files.as_deref(),
            Some("REMOVE")
        );
    }

    #[test]
    fn test_unknown_location_type_is_configuration_error() {
        let raw = NFS_TO_S3.replace("type = \"nfs\"", "type = \"ftp\"");
        let err = RunConfig::from_toml_str(&raw).unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let raw = format!("{}\n[polling]\ninterval_secs = 0\n", NFS_TO_S3);
        assert!(RunConfig::from_toml_str(&raw).is_err());
    }

    #[test]
    fn test_json_config() {
        let raw = r#"{
            "task_arn": "arn:aws:datasync:eu-west-1:123:task/task-1",
            "source": {
                "location_arn": "arn:aws:datasync:eu-west-1:123:location/loc-1",
                "type": "nfs",
                "subdirectory": "/new/source/subdirectory/"
            },
            "polling": { "interval_secs": 1, "timeout_secs": 60 }
        }"#;
        let config = RunConfig::from_json_str(raw).unwrap();
        let source = config.source.unwrap();
        assert_eq!(
            source.location_arn.as_deref(),
            Some("arn:aws:datasync:eu-west-1:123:location/loc-1")
        );
        match source.spec {
            LocationSpec::Nfs(nfs) => {
                assert_eq!(nfs.subdirectory.as_deref(), Some("/new/source/subdirectory/"))
            }
            other => panic!("unexpected spec: {:?}", other),
        }
        assert_eq!(config.polling.timeout(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = RunConfig::from_path("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_from_path_resolves_template_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        let raw = format!(
            "{}\n[notification]\nsuccess_template = \"templates/ok.txt\"\n",
            NFS_TO_S3
        );
        std::fs::write(&path, raw).unwrap();

        let config = RunConfig::from_path(&path).unwrap();
        assert_eq!(
            config.notification.success_template,
            Some(dir.path().join("templates/ok.txt"))
        );
    }

    #[test]
    fn test_debug_output_redacts_passwords() {
        let raw = r#"
[source]
type = "smb"
hostname = "smb.internal"
subdirectory = "/share"
user = "sync"
password = "correct-horse"
agent_arns = ["arn:aws:datasync:eu-west-1:123:agent/agent-1"]

[destination]
type = "s3"
arn = "arn:aws:s3:::my-bucket"
access_role_arn = "arn:aws:iam::123:role/datasync"
"#;
        let config = RunConfig::from_toml_str(raw).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("correct-horse"));
        assert!(printed.contains("Secret(***)"));
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.log_path(), PathBuf::from("./output.log"));
        assert!(settings.validate().is_ok());
    }
}
