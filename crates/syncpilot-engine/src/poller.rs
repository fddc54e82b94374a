//! Task readiness and execution polling
//!
//! Both stages describe, log and then either stop or sleep one interval.
//! There is no sleep after the observation that ends a stage.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use syncpilot_aws::DataSyncApi;
use syncpilot_core::models::{ExecutionDescription, FilterRule, TaskDescription, TaskStatus};
use syncpilot_core::{PollingConfig, RunHooks, SyncError, SyncResult};

use crate::clock::{elapsed_secs, Clock};

/// How the execution stage ended
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// SUCCESS or ERROR was observed
    Finished(ExecutionDescription),
    /// `during_task_execution` returned false; holds the last observation
    Aborted(ExecutionDescription),
}

#[derive(Clone)]
pub struct ExecutionPoller {
    datasync: Arc<dyn DataSyncApi>,
    clock: Arc<dyn Clock>,
    polling: PollingConfig,
}

impl ExecutionPoller {
    pub fn new(datasync: Arc<dyn DataSyncApi>, clock: Arc<dyn Clock>, polling: PollingConfig) -> Self {
        Self {
            datasync,
            clock,
            polling,
        }
    }

    /// Poll the task until it is AVAILABLE or QUEUED.
    ///
    /// UNAVAILABLE means the agent cannot run the task and fails the run.
    pub async fn wait_until_ready(&self, task_arn: &str) -> SyncResult<TaskDescription> {
        let started = self.clock.now();

        loop {
            let task = self.datasync.describe_task(task_arn).await?;
            let elapsed = elapsed_secs(self.clock.as_ref(), started);
            tracing::info!(
                task_arn = %task_arn,
                elapsed_secs = elapsed,
                status = %task.status,
                "task status ({}s): {}",
                elapsed,
                task.status
            );

            if task.status == TaskStatus::Unavailable {
                let detail = task
                    .error_detail
                    .as_deref()
                    .unwrap_or("no detail reported");
                return Err(SyncError::InvalidReference(format!(
                    "the DataSync agent is unable to run task {}: {}",
                    task_arn, detail
                )));
            }
            if task.status.is_ready() {
                return Ok(task);
            }

            self.check_timeout("task readiness", started)?;
            self.clock.sleep(self.polling.interval()).await;
        }
    }

    /// Start one execution of `task` and poll it until SUCCESS or ERROR.
    ///
    /// `during_task_execution` is called after every observation, the
    /// terminal one included.
    pub async fn run_execution(
        &self,
        task: &TaskDescription,
        includes: &[FilterRule],
        hooks: &dyn RunHooks,
    ) -> SyncResult<ExecutionOutcome> {
        let execution_arn = self
            .datasync
            .start_task_execution(&task.task_arn, includes)
            .await?;
        let started = self.clock.now();

        loop {
            let execution = self
                .datasync
                .describe_task_execution(&execution_arn)
                .await?;
            let elapsed = elapsed_secs(self.clock.as_ref(), started);
            tracing::info!(
                task_execution_arn = %execution_arn,
                elapsed_secs = elapsed,
                status = %execution.status,
                "task execution status ({}s): {}",
                elapsed,
                execution.status
            );

            if !hooks.during_task_execution(task, &execution).await? {
                tracing::warn!(
                    task_execution_arn = %execution_arn,
                    status = %execution.status,
                    "Polling stopped by during_task_execution hook"
                );
                return Ok(ExecutionOutcome::Aborted(execution));
            }

            if execution.status.is_terminal() {
                return Ok(ExecutionOutcome::Finished(execution));
            }

            self.check_timeout("task execution", started)?;
            self.clock.sleep(self.polling.interval()).await;
        }
    }

    fn check_timeout(&self, stage: &'static str, started: DateTime<Utc>) -> SyncResult<()> {
        let Some(timeout) = self.polling.timeout() else {
            return Ok(());
        };

        let waited_secs = elapsed_secs(self.clock.as_ref(), started);
        if waited_secs >= timeout.as_secs() {
            tracing::error!(stage = stage, waited_secs = waited_secs, "Polling timed out");
            return Err(SyncError::Timeout { stage, waited_secs });
        }
        Ok(())
    }
}
