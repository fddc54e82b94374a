//! Scripted in-memory DataSync
//!
//! Task and execution statuses are served from scripts; the last entry
//! repeats once a script is exhausted. Every call is recorded.

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use syncpilot_aws::DataSyncApi;
use syncpilot_core::models::{
    ExecutionDescription, ExecutionStatus, FilterRule, LocationKind, LocationSpec, NewTask,
    TaskDescription, TaskStatus, TaskUpdate,
};
use syncpilot_core::{SyncError, SyncResult};

pub const TASK_ARN: &str = "arn:aws:datasync:eu-west-1:123456789012:task/task-0001";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateLocation(LocationKind),
    UpdateLocation(String),
    DeleteLocation(String),
    CreateTask(NewTask),
    UpdateTask(TaskUpdate),
    DescribeTask(String),
    StartTaskExecution {
        task_arn: String,
        includes: Vec<FilterRule>,
    },
    DescribeTaskExecution(String),
}

impl Call {
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Call::DescribeTask(_) | Call::DescribeTaskExecution(_))
    }
}

pub struct MockDataSync {
    calls: Mutex<Vec<Call>>,
    task_statuses: Mutex<VecDeque<TaskStatus>>,
    executions: Mutex<VecDeque<ExecutionDescription>>,
    rejected_arns: Mutex<HashSet<String>>,
    next_location: Mutex<u32>,
    task_locations: Mutex<Option<(String, String)>>,
}

impl MockDataSync {
    /// Task immediately AVAILABLE, execution immediately SUCCESS
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            task_statuses: Mutex::new(VecDeque::from([TaskStatus::Available])),
            executions: Mutex::new(VecDeque::from([ExecutionDescription::new(
                execution_arn(),
                ExecutionStatus::Success,
            )])),
            rejected_arns: Mutex::new(HashSet::new()),
            next_location: Mutex::new(0),
            task_locations: Mutex::new(None),
        }
    }

    pub fn with_task_statuses(self, statuses: Vec<TaskStatus>) -> Self {
        *self.task_statuses.lock().unwrap() = statuses.into();
        self
    }

    pub fn with_executions(self, executions: Vec<ExecutionDescription>) -> Self {
        *self.executions.lock().unwrap() = executions.into();
        self
    }

    /// Calls that target `arn` answer like an invalid-request response
    pub fn rejecting(self, arn: &str) -> Self {
        self.rejected_arns.lock().unwrap().insert(arn.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    pub fn start_count(&self) -> usize {
        self.count(|c| matches!(c, Call::StartTaskExecution { .. }))
    }

    pub fn describe_execution_count(&self) -> usize {
        self.count(|c| matches!(c, Call::DescribeTaskExecution(_)))
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_reference(&self, operation: &str, arn: &str) -> SyncResult<()> {
        if self.rejected_arns.lock().unwrap().contains(arn) {
            return Err(SyncError::InvalidReference(format!(
                "{} rejected {}: not found",
                operation, arn
            )));
        }
        Ok(())
    }

    /// Next scripted entry, repeating the last one
    fn next<T: Clone>(script: &Mutex<VecDeque<T>>) -> T {
        let mut script = script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().expect("script must not be empty")
        }
    }
}

impl Default for MockDataSync {
    fn default() -> Self {
        Self::new()
    }
}

pub fn location_arn(n: u32) -> String {
    format!("arn:aws:datasync:eu-west-1:123456789012:location/loc-{:04}", n)
}

pub fn execution_arn() -> String {
    format!("{}/execution/exec-0001", TASK_ARN)
}

#[async_trait]
impl DataSyncApi for MockDataSync {
    async fn create_location(&self, spec: &LocationSpec) -> SyncResult<String> {
        self.record(Call::CreateLocation(spec.kind()));
        let mut next = self.next_location.lock().unwrap();
        *next += 1;
        Ok(location_arn(*next))
    }

    async fn update_location(&self, location_arn: &str, _spec: &LocationSpec) -> SyncResult<()> {
        self.record(Call::UpdateLocation(location_arn.to_string()));
        self.check_reference("UpdateLocation", location_arn)
    }

    async fn delete_location(&self, location_arn: &str) -> SyncResult<()> {
        self.record(Call::DeleteLocation(location_arn.to_string()));
        self.check_reference("DeleteLocation", location_arn)
    }

    async fn create_task(&self, task: &NewTask) -> SyncResult<String> {
        self.record(Call::CreateTask(task.clone()));
        *self.task_locations.lock().unwrap() = Some((
            task.source_location_arn.clone(),
            task.destination_location_arn.clone(),
        ));
        Ok(TASK_ARN.to_string())
    }

    async fn update_task(&self, update: &TaskUpdate) -> SyncResult<()> {
        self.record(Call::UpdateTask(update.clone()));
        self.check_reference("UpdateTask", &update.task_arn)
    }

    async fn describe_task(&self, task_arn: &str) -> SyncResult<TaskDescription> {
        self.record(Call::DescribeTask(task_arn.to_string()));
        self.check_reference("DescribeTask", task_arn)?;

        let mut task = TaskDescription::new(task_arn, Self::next(&self.task_statuses));
        if let Some((source, destination)) = self.task_locations.lock().unwrap().clone() {
            task.source_location_arn = Some(source);
            task.destination_location_arn = Some(destination);
        }
        Ok(task)
    }

    async fn start_task_execution(
        &self,
        task_arn: &str,
        includes: &[FilterRule],
    ) -> SyncResult<String> {
        self.record(Call::StartTaskExecution {
            task_arn: task_arn.to_string(),
            includes: includes.to_vec(),
        });
        self.check_reference("StartTaskExecution", task_arn)?;
        Ok(execution_arn())
    }

    async fn describe_task_execution(
        &self,
        execution_arn: &str,
    ) -> SyncResult<ExecutionDescription> {
        self.record(Call::DescribeTaskExecution(execution_arn.to_string()));
        Ok(Self::next(&self.executions))
    }
}
