//! Task creation and update

use std::sync::Arc;
use syncpilot_aws::DataSyncApi;
use syncpilot_core::models::{LocationDescriptor, NewTask, TaskUpdate};
use syncpilot_core::{RunConfig, SyncError, SyncResult};

use crate::resolver::{LocationResolver, ResolvedLocation};

/// Result of configuring the task for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredTask {
    pub task_arn: String,
    /// Whether this run created the task
    pub created: bool,
    pub source: Option<ResolvedLocation>,
    pub destination: Option<ResolvedLocation>,
}

impl ConfiguredTask {
    /// ARNs of the locations created by this run
    pub fn created_locations(&self) -> Vec<String> {
        [&self.source, &self.destination]
            .into_iter()
            .flatten()
            .filter(|location| location.created)
            .map(|location| location.arn.clone())
            .collect()
    }
}

#[derive(Clone)]
pub struct TaskManager {
    datasync: Arc<dyn DataSyncApi>,
    resolver: LocationResolver,
}

impl TaskManager {
    pub fn new(datasync: Arc<dyn DataSyncApi>) -> Self {
        let resolver = LocationResolver::new(datasync.clone());
        Self { datasync, resolver }
    }

    /// Create the task, or update it when `config.task_arn` is set.
    ///
    /// Every location is checked before the first remote call.
    pub async fn configure(&self, config: &RunConfig) -> SyncResult<ConfiguredTask> {
        match &config.task_arn {
            Some(task_arn) => self.update(task_arn, config).await,
            None => self.create(config).await,
        }
    }

    async fn create(&self, config: &RunConfig) -> SyncResult<ConfiguredTask> {
        let (source, destination) = match (&config.source, &config.destination) {
            (Some(source), Some(destination)) => (source, destination),
            _ => {
                return Err(SyncError::config(
                    "both source and destination locations must be configured to create a task",
                ))
            }
        };
        LocationResolver::check("source", source)?;
        LocationResolver::check("destination", destination)?;

        let source = self.resolver.resolve("source", source).await?;
        let destination = self.resolver.resolve("destination", destination).await?;

        let task = NewTask {
            source_location_arn: source.arn.clone(),
            destination_location_arn: destination.arn.clone(),
            name: config.name.clone(),
            cloudwatch_log_group_arn: config.cloudwatch_log_group_arn.clone(),
            schedule: config.schedule.clone(),
            options: config.options.clone(),
            excludes: config.excludes.clone(),
            tags: config.tags.clone(),
        };
        let task_arn = self.datasync.create_task(&task).await?;

        tracing::info!(
            task_arn = %task_arn,
            source_location_arn = %source.arn,
            destination_location_arn = %destination.arn,
            "Task created"
        );

        Ok(ConfiguredTask {
            task_arn,
            created: true,
            source: Some(source),
            destination: Some(destination),
        })
    }

    async fn update(&self, task_arn: &str, config: &RunConfig) -> SyncResult<ConfiguredTask> {
        let configured = [
            ("source", config.source.as_ref()),
            ("destination", config.destination.as_ref()),
        ];

        for (role, descriptor) in configured {
            if let Some(descriptor) = descriptor {
                require_arn(role, descriptor)?;
                LocationResolver::check(role, descriptor)?;
            }
        }

        let mut resolved = Vec::with_capacity(2);
        for (role, descriptor) in configured {
            resolved.push(match descriptor {
                Some(descriptor) => Some(self.resolver.resolve(role, descriptor).await?),
                None => None,
            });
        }
        let destination = resolved.pop().flatten();
        let source = resolved.pop().flatten();

        let update = TaskUpdate {
            task_arn: task_arn.to_string(),
            name: config.name.clone(),
            cloudwatch_log_group_arn: config.cloudwatch_log_group_arn.clone(),
            schedule: config.schedule.clone(),
            options: config.options.clone(),
            excludes: config.excludes.clone(),
        };
        self.datasync.update_task(&update).await?;

        tracing::info!(task_arn = %task_arn, "Task updated");

        Ok(ConfiguredTask {
            task_arn: task_arn.to_string(),
            created: false,
            source,
            destination,
        })
    }
}

fn require_arn(role: &str, descriptor: &LocationDescriptor) -> SyncResult<()> {
    if descriptor.location_arn.is_none() {
        return Err(SyncError::config(format!(
            "{} location must have a location_arn when updating an existing task",
            role
        )));
    }
    Ok(())
}
