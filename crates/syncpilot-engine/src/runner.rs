//! One complete run
//!
//! before_task_configuration → locations and task → readiness →
//! before_task_execution → execution polling → after_task_execution →
//! notification → cleanup.

use std::sync::Arc;
use syncpilot_aws::{DataSyncApi, NotificationPublisher};
use syncpilot_core::models::{ExecutionDescription, ExecutionStatus, TaskDescription};
use syncpilot_core::{HookStage, NoOpHooks, RunConfig, RunHooks, SyncResult};
use uuid::Uuid;

use crate::cleanup::delete_created_locations;
use crate::clock::{Clock, SystemClock};
use crate::notifier::{NotificationContext, Notifier};
use crate::poller::{ExecutionOutcome, ExecutionPoller};
use crate::task_manager::{ConfiguredTask, TaskManager};

/// Summary of a run that reached a terminal execution state
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub run_id: Uuid,
    pub task_arn: String,
    pub source_location_arn: Option<String>,
    pub destination_location_arn: Option<String>,
    pub execution: ExecutionDescription,
    /// Locations created by this run (deleted again when cleanup is enabled)
    pub created_locations: Vec<String>,
    pub deleted_locations: usize,
    /// SNS message ID when a notification was published
    pub notification_id: Option<String>,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.execution.status == ExecutionStatus::Success
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(RunReport),
    /// A hook returned false. `task_arn` is set when the task was already configured.
    Aborted {
        stage: HookStage,
        task_arn: Option<String>,
    },
}

pub struct SyncRunner {
    datasync: Arc<dyn DataSyncApi>,
    publisher: Arc<dyn NotificationPublisher>,
    clock: Arc<dyn Clock>,
    hooks: Arc<dyn RunHooks>,
}

impl SyncRunner {
    pub fn new(datasync: Arc<dyn DataSyncApi>, publisher: Arc<dyn NotificationPublisher>) -> Self {
        Self {
            datasync,
            publisher,
            clock: Arc::new(SystemClock),
            hooks: Arc::new(NoOpHooks),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn RunHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub async fn run(&self, config: &RunConfig) -> SyncResult<RunOutcome> {
        self.run_with_id(Uuid::new_v4(), config).await
    }

    #[tracing::instrument(name = "run", skip_all, fields(run_id = %run_id))]
    async fn run_with_id(&self, run_id: Uuid, config: &RunConfig) -> SyncResult<RunOutcome> {
        config.validate()?;
        let notifier = Notifier::from_config(config, self.publisher.clone())?;

        if !self.hooks.before_task_configuration(config).await? {
            return Ok(aborted(HookStage::BeforeTaskConfiguration, None));
        }

        let configured = TaskManager::new(self.datasync.clone())
            .configure(config)
            .await?;
        let poller = ExecutionPoller::new(
            self.datasync.clone(),
            self.clock.clone(),
            config.polling.clone(),
        );

        let task = poller.wait_until_ready(&configured.task_arn).await?;
        tracing::info!(task_arn = %task.task_arn, status = %task.status, "Task ready");

        if !self.hooks.before_task_execution(&task).await? {
            return Ok(aborted(
                HookStage::BeforeTaskExecution,
                Some(configured.task_arn),
            ));
        }

        let mut execution = match poller
            .run_execution(&task, &config.includes, self.hooks.as_ref())
            .await?
        {
            ExecutionOutcome::Finished(execution) => execution,
            ExecutionOutcome::Aborted(_) => {
                return Ok(aborted(
                    HookStage::DuringTaskExecution,
                    Some(configured.task_arn),
                ))
            }
        };
        if execution.end_time.is_none() {
            execution.end_time = Some(self.clock.now());
        }

        tracing::info!(
            task_execution_arn = %execution.execution_arn,
            status = %execution.status,
            files_transferred = execution.files_transferred,
            bytes_transferred = execution.bytes_transferred,
            "Task execution finished"
        );

        self.hooks.after_task_execution(&task, &execution).await?;

        let (source, destination) = location_arns(&configured, &task);
        let notification_id = match &notifier {
            Some(notifier) => {
                let context = NotificationContext {
                    task_arn: configured.task_arn.clone(),
                    source: source.clone().unwrap_or_else(|| "unknown".to_string()),
                    destination: destination.clone().unwrap_or_else(|| "unknown".to_string()),
                    execution: execution.clone(),
                };
                Some(notifier.notify(&context).await?)
            }
            None => None,
        };

        let created_locations = configured.created_locations();
        let deleted_locations = if config.cleanup.delete_created_locations {
            delete_created_locations(self.datasync.as_ref(), &created_locations).await?
        } else {
            0
        };

        Ok(RunOutcome::Completed(RunReport {
            run_id,
            task_arn: configured.task_arn,
            source_location_arn: source,
            destination_location_arn: destination,
            execution,
            created_locations,
            deleted_locations,
            notification_id,
        }))
    }
}

fn aborted(stage: HookStage, task_arn: Option<String>) -> RunOutcome {
    tracing::warn!(stage = %stage, "Run stopped by hook");
    RunOutcome::Aborted { stage, task_arn }
}

/// Resolved ARNs, falling back to what the task reports for locations
/// that were not part of the configuration.
fn location_arns(
    configured: &ConfiguredTask,
    task: &TaskDescription,
) -> (Option<String>, Option<String>) {
    let source = configured
        .source
        .as_ref()
        .map(|l| l.arn.clone())
        .or_else(|| task.source_location_arn.clone());
    let destination = configured
        .destination
        .as_ref()
        .map(|l| l.arn.clone())
        .or_else(|| task.destination_location_arn.clone());
    (source, destination)
}
