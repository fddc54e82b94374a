//! syncpilot command line
//!
//! Argument parsing and the mapping from run outcomes to exit codes live
//! here so they can be tested without touching AWS.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use syncpilot_core::{LogLevel, NoOpHooks, RunConfig, RunHooks, SyncError, SyncResult};
use syncpilot_engine::{CommandHooks, RunOutcome};

pub const EXIT_SUCCESS: u8 = 0;
/// Execution finished with ERROR
pub const EXIT_EXECUTION_FAILED: u8 = 2;
/// A lifecycle hook stopped the run
pub const EXIT_ABORTED: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    name = "syncpilot",
    version,
    about = "Create or update a DataSync task, run it and report the result"
)]
pub struct Cli {
    /// Run configuration file (.toml or .json)
    #[arg(short = 'c', long = "config-file")]
    pub config_file: PathBuf,

    /// Seconds between status checks, overriding polling.interval_secs
    #[arg(long)]
    pub poll_interval: Option<u64>,
}

impl Cli {
    /// Load the run file and apply command-line overrides
    pub fn load_config(&self) -> SyncResult<RunConfig> {
        let mut config = RunConfig::from_path(&self.config_file)?;
        if let Some(interval) = self.poll_interval {
            config.polling.interval_secs = interval;
            config.validate()?;
        }
        Ok(config)
    }
}

/// Command hooks when the run file configures any, otherwise no-op hooks
pub fn hooks_for(config: &RunConfig) -> Arc<dyn RunHooks> {
    if config.hooks.is_empty() {
        Arc::new(NoOpHooks)
    } else {
        Arc::new(CommandHooks::new(config.hooks.clone()))
    }
}

/// Process exit status for a run that did not fail. Fatal errors exit with 1.
pub fn exit_status(outcome: &RunOutcome) -> u8 {
    match outcome {
        RunOutcome::Completed(report) if report.succeeded() => EXIT_SUCCESS,
        RunOutcome::Completed(_) => EXIT_EXECUTION_FAILED,
        RunOutcome::Aborted { .. } => EXIT_ABORTED,
    }
}

/// Log a fatal error at the level its kind calls for
pub fn log_fatal(err: &SyncError) {
    match err.log_level() {
        LogLevel::Warn => {
            tracing::warn!(error_code = err.error_code(), error = %err, "Run failed")
        }
        LogLevel::Error => {
            tracing::error!(error_code = err.error_code(), error = %err, "Run failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use syncpilot_core::models::{ExecutionDescription, ExecutionStatus};
    use syncpilot_core::HookStage;
    use syncpilot_engine::RunReport;

    fn completed(status: ExecutionStatus) -> RunOutcome {
        RunOutcome::Completed(RunReport {
            run_id: uuid::Uuid::new_v4(),
            task_arn: "arn:task".to_string(),
            source_location_arn: None,
            destination_location_arn: None,
            execution: ExecutionDescription::new("arn:exec", status),
            created_locations: Vec::new(),
            deleted_locations: 0,
            notification_id: None,
        })
    }

    #[test]
    fn test_exit_status_per_outcome() {
        assert_eq!(exit_status(&completed(ExecutionStatus::Success)), EXIT_SUCCESS);
        assert_eq!(
            exit_status(&completed(ExecutionStatus::Error)),
            EXIT_EXECUTION_FAILED
        );
        let aborted = RunOutcome::Aborted {
            stage: HookStage::DuringTaskExecution,
            task_arn: None,
        };
        assert_eq!(exit_status(&aborted), EXIT_ABORTED);
    }

    #[test]
    fn test_config_file_is_required() {
        assert!(Cli::try_parse_from(["syncpilot"]).is_err());
    }

    #[test]
    fn test_parse_short_and_long_flags() {
        let cli = Cli::try_parse_from(["syncpilot", "-c", "run.toml"]).unwrap();
        assert_eq!(cli.config_file, PathBuf::from("run.toml"));
        assert!(cli.poll_interval.is_none());

        let cli = Cli::try_parse_from([
            "syncpilot",
            "--config-file",
            "run.json",
            "--poll-interval",
            "30",
        ])
        .unwrap();
        assert_eq!(cli.config_file, PathBuf::from("run.json"));
        assert_eq!(cli.poll_interval, Some(30));
    }

    #[test]
    fn test_missing_config_file_is_a_configuration_error() {
        let cli = Cli::try_parse_from(["syncpilot", "-c", "/nonexistent/run.toml"]).unwrap();
        let err = cli.load_config().unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
    }

    #[test]
    fn test_poll_interval_override_is_validated() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "task_arn = \"arn:aws:datasync:eu-west-1:123:task/task-1\"").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from(["syncpilot", "-c", &path, "--poll-interval", "2"]).unwrap();
        assert_eq!(cli.load_config().unwrap().polling.interval_secs, 2);

        let cli = Cli::try_parse_from(["syncpilot", "-c", &path, "--poll-interval", "0"]).unwrap();
        assert!(cli.load_config().is_err());
    }

    #[tokio::test]
    async fn test_configured_hook_commands_gate_the_run() {
        let mut config = RunConfig::default();
        assert!(hooks_for(&config)
            .before_task_configuration(&config)
            .await
            .unwrap());

        config.hooks.before_task_configuration = Some("exit 1".to_string());
        assert!(!hooks_for(&config)
            .before_task_configuration(&config)
            .await
            .unwrap());
    }
}
