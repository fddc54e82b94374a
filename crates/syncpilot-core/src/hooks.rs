//! Lifecycle hooks
//!
//! A run calls these at fixed points. The first three return whether the run
//! should continue; returning `false` stops it without an error.
//! `HookRegistry` lets library callers register plain closures instead of
//! implementing the trait.

use async_trait::async_trait;
use std::fmt;

use crate::config::RunConfig;
use crate::error::SyncResult;
use crate::models::{ExecutionDescription, TaskDescription};

/// Stage at which a hook can stop the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    BeforeTaskConfiguration,
    BeforeTaskExecution,
    DuringTaskExecution,
    AfterTaskExecution,
}

impl HookStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookStage::BeforeTaskConfiguration => "before_task_configuration",
            HookStage::BeforeTaskExecution => "before_task_execution",
            HookStage::DuringTaskExecution => "during_task_execution",
            HookStage::AfterTaskExecution => "after_task_execution",
        }
    }
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait RunHooks: Send + Sync {
    /// Called after the configuration is loaded, before any remote call
    async fn before_task_configuration(&self, _config: &RunConfig) -> SyncResult<bool> {
        Ok(true)
    }

    /// Called once the task is ready, before the execution starts
    async fn before_task_execution(&self, _task: &TaskDescription) -> SyncResult<bool> {
        Ok(true)
    }

    /// Called on every execution poll tick
    async fn during_task_execution(
        &self,
        _task: &TaskDescription,
        _execution: &ExecutionDescription,
    ) -> SyncResult<bool> {
        Ok(true)
    }

    /// Called once the execution reached SUCCESS or ERROR
    async fn after_task_execution(
        &self,
        _task: &TaskDescription,
        _execution: &ExecutionDescription,
    ) -> SyncResult<()> {
        Ok(())
    }
}

/// Hooks that never interrupt a run
pub struct NoOpHooks;

#[async_trait]
impl RunHooks for NoOpHooks {}

type ConfigCallback = Box<dyn Fn(&RunConfig) -> bool + Send + Sync>;
type TaskCallback = Box<dyn Fn(&TaskDescription) -> bool + Send + Sync>;
type ExecutionCallback = Box<dyn Fn(&TaskDescription, &ExecutionDescription) -> bool + Send + Sync>;
type CompletionCallback = Box<dyn Fn(&TaskDescription, &ExecutionDescription) + Send + Sync>;

/// Closure-based hooks. Unregistered stages continue.
#[derive(Default)]
pub struct HookRegistry {
    before_task_configuration: Option<ConfigCallback>,
    before_task_execution: Option<TaskCallback>,
    during_task_execution: Option<ExecutionCallback>,
    after_task_execution: Option<CompletionCallback>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_before_task_configuration(
        mut self,
        callback: impl Fn(&RunConfig) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.before_task_configuration = Some(Box::new(callback));
        self
    }

    pub fn on_before_task_execution(
        mut self,
        callback: impl Fn(&TaskDescription) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.before_task_execution = Some(Box::new(callback));
        self
    }

    pub fn on_during_task_execution(
        mut self,
        callback: impl Fn(&TaskDescription, &ExecutionDescription) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.during_task_execution = Some(Box::new(callback));
        self
    }

    pub fn on_after_task_execution(
        mut self,
        callback: impl Fn(&TaskDescription, &ExecutionDescription) + Send + Sync + 'static,
    ) -> Self {
        self.after_task_execution = Some(Box::new(callback));
        self
    }
}

#[async_trait]
impl RunHooks for HookRegistry {
    async fn before_task_configuration(&self, config: &RunConfig) -> SyncResult<bool> {
        Ok(self
            .before_task_configuration
            .as_ref()
            .map_or(true, |hook| hook(config)))
    }

    async fn before_task_execution(&self, task: &TaskDescription) -> SyncResult<bool> {
        Ok(self
            .before_task_execution
            .as_ref()
            .map_or(true, |hook| hook(task)))
    }

    async fn during_task_execution(
        &self,
        task: &TaskDescription,
        execution: &ExecutionDescription,
    ) -> SyncResult<bool> {
        Ok(self
            .during_task_execution
            .as_ref()
            .map_or(true, |hook| hook(task, execution)))
    }

    async fn after_task_execution(
        &self,
        task: &TaskDescription,
        execution: &ExecutionDescription,
    ) -> SyncResult<()> {
        if let Some(hook) = &self.after_task_execution {
            hook(task, execution);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExecutionStatus, TaskStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_noop_hooks_continue() {
        let hooks = NoOpHooks;
        let task = TaskDescription::new("task", TaskStatus::Available);
        let execution = ExecutionDescription::new("exec", ExecutionStatus::Transferring);

        assert!(hooks
            .before_task_configuration(&RunConfig::default())
            .await
            .unwrap());
        assert!(hooks.before_task_execution(&task).await.unwrap());
        assert!(hooks
            .during_task_execution(&task, &execution)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_registry_uses_registered_callbacks() {
        let completed = Arc::new(AtomicUsize::new(0));
        let counter = completed.clone();

        let hooks = HookRegistry::new()
            .on_before_task_execution(|task| task.status == TaskStatus::Available)
            .on_during_task_execution(|_, execution| execution.files_transferred < 100)
            .on_after_task_execution(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        let queued = TaskDescription::new("task", TaskStatus::Queued);
        assert!(!hooks.before_task_execution(&queued).await.unwrap());

        let task = TaskDescription::new("task", TaskStatus::Available);
        let mut execution = ExecutionDescription::new("exec", ExecutionStatus::Transferring);
        assert!(hooks
            .during_task_execution(&task, &execution)
            .await
            .unwrap());
        execution.files_transferred = 150;
        assert!(!hooks
            .during_task_execution(&task, &execution)
            .await
            .unwrap());

        hooks.after_task_execution(&task, &execution).await.unwrap();
        assert_eq!(completed.load(Ordering::SeqCst), 1);

        // not registered: continues
        assert!(hooks
            .before_task_configuration(&RunConfig::default())
            .await
            .unwrap());
    }
}
