//! Lifecycle hooks backed by shell commands
//!
//! Each configured command runs through `sh -c` with the run state in
//! `SYNCPILOT_*` environment variables. For the first three stages exit
//! status 0 continues the run and anything else stops it. The outcome of
//! `after_task_execution` is only logged.

use async_trait::async_trait;
use std::process::Output;
use syncpilot_core::models::{ExecutionDescription, TaskDescription};
use syncpilot_core::{HookCommands, HookStage, RunConfig, RunHooks, SyncError, SyncResult};
use tokio::process::Command;

pub struct CommandHooks {
    commands: HookCommands,
}

impl CommandHooks {
    pub fn new(commands: HookCommands) -> Self {
        Self { commands }
    }

    fn command(&self, stage: HookStage) -> Option<&str> {
        match stage {
            HookStage::BeforeTaskConfiguration => self.commands.before_task_configuration.as_deref(),
            HookStage::BeforeTaskExecution => self.commands.before_task_execution.as_deref(),
            HookStage::DuringTaskExecution => self.commands.during_task_execution.as_deref(),
            HookStage::AfterTaskExecution => self.commands.after_task_execution.as_deref(),
        }
    }

    /// Run the stage's command. None when no command is configured.
    async fn run(&self, stage: HookStage, env: Vec<(&'static str, String)>) -> SyncResult<Option<bool>> {
        let Some(command) = self.command(stage) else {
            return Ok(None);
        };

        tracing::debug!(stage = %stage, command = %command, "Running hook command");
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .env("SYNCPILOT_HOOK_STAGE", stage.as_str())
            .envs(env)
            .output()
            .await
            .map_err(|e| SyncError::Hook(format!("{} hook could not be started: {}", stage, e)))?;

        log_output(stage, &output);
        let success = output.status.success();
        if !success {
            tracing::warn!(stage = %stage, status = %output.status, "Hook command exited with failure");
        }
        Ok(Some(success))
    }
}

fn log_output(stage: HookStage, output: &Output) {
    for line in String::from_utf8_lossy(&output.stdout).lines() {
        tracing::info!(stage = %stage, "hook: {}", line);
    }
    for line in String::from_utf8_lossy(&output.stderr).lines() {
        tracing::warn!(stage = %stage, "hook: {}", line);
    }
}

fn task_env(task: &TaskDescription) -> Vec<(&'static str, String)> {
    vec![
        ("SYNCPILOT_TASK_ARN", task.task_arn.clone()),
        ("SYNCPILOT_TASK_STATUS", task.status.to_string()),
    ]
}

fn execution_env(task: &TaskDescription, execution: &ExecutionDescription) -> Vec<(&'static str, String)> {
    let mut env = task_env(task);
    env.extend([
        ("SYNCPILOT_EXECUTION_ARN", execution.execution_arn.clone()),
        ("SYNCPILOT_EXECUTION_STATUS", execution.status.to_string()),
        ("SYNCPILOT_FILES_TRANSFERRED", execution.files_transferred.to_string()),
        ("SYNCPILOT_BYTES_TRANSFERRED", execution.bytes_transferred.to_string()),
        (
            "SYNCPILOT_ERROR_CODE",
            execution.error_code.clone().unwrap_or_default(),
        ),
        (
            "SYNCPILOT_ERROR_DETAIL",
            execution.error_detail.clone().unwrap_or_default(),
        ),
    ]);
    env
}

#[async_trait]
impl RunHooks for CommandHooks {
    async fn before_task_configuration(&self, config: &RunConfig) -> SyncResult<bool> {
        let mut env = Vec::new();
        if let Some(task_arn) = &config.task_arn {
            env.push(("SYNCPILOT_TASK_ARN", task_arn.clone()));
        }
        Ok(self
            .run(HookStage::BeforeTaskConfiguration, env)
            .await?
            .unwrap_or(true))
    }

    async fn before_task_execution(&self, task: &TaskDescription) -> SyncResult<bool> {
        Ok(self
            .run(HookStage::BeforeTaskExecution, task_env(task))
            .await?
            .unwrap_or(true))
    }

    async fn during_task_execution(
        &self,
        task: &TaskDescription,
        execution: &ExecutionDescription,
    ) -> SyncResult<bool> {
        Ok(self
            .run(HookStage::DuringTaskExecution, execution_env(task, execution))
            .await?
            .unwrap_or(true))
    }

    async fn after_task_execution(
        &self,
        task: &TaskDescription,
        execution: &ExecutionDescription,
    ) -> SyncResult<()> {
        self.run(HookStage::AfterTaskExecution, execution_env(task, execution))
            .await?;
        Ok(())
    }
}
