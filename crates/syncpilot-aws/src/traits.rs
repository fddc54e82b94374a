//! Remote service abstraction traits
//!
//! Every call is one request to the managed service. Implementations do not
//! retry; failures are returned as [`SyncError`](syncpilot_core::SyncError).

use async_trait::async_trait;
use syncpilot_core::models::{
    ExecutionDescription, FilterRule, LocationSpec, NewTask, TaskDescription, TaskUpdate,
};
use syncpilot_core::SyncResult;

/// DataSync operations used by a run
#[async_trait]
pub trait DataSyncApi: Send + Sync {
    /// Create a location and return its ARN
    async fn create_location(&self, spec: &LocationSpec) -> SyncResult<String>;

    /// Update an existing location with the fields present in `spec`
    async fn update_location(&self, location_arn: &str, spec: &LocationSpec) -> SyncResult<()>;

    async fn delete_location(&self, location_arn: &str) -> SyncResult<()>;

    /// Create a task and return its ARN
    async fn create_task(&self, task: &NewTask) -> SyncResult<String>;

    async fn update_task(&self, update: &TaskUpdate) -> SyncResult<()>;

    async fn describe_task(&self, task_arn: &str) -> SyncResult<TaskDescription>;

    /// Start (or enqueue) an execution and return its ARN
    async fn start_task_execution(
        &self,
        task_arn: &str,
        includes: &[FilterRule],
    ) -> SyncResult<String>;

    async fn describe_task_execution(&self, execution_arn: &str)
        -> SyncResult<ExecutionDescription>;
}

/// Publishes a message to a notification topic
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    /// Publish and return the message ID assigned by the service
    async fn publish(&self, topic_arn: &str, subject: &str, message: &str) -> SyncResult<String>;
}
