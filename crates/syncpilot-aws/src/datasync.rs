use async_trait::async_trait;
use aws_sdk_datasync::types::{
    EfsInTransitEncryption, NfsMountOptions, NfsVersion, ObjectStorageServerProtocol,
    S3StorageClass, SmbMountOptions, SmbVersion,
};
use aws_sdk_datasync::Client as DataSyncClient;
use chrono::Duration as ChronoDuration;
use syncpilot_core::models::{
    EfsLocation, ExecutionDescription, ExecutionStatus, FilterRule, FsxWindowsLocation,
    LocationSpec, NewTask, NfsLocation, ObjectStorageLocation, S3Location, SmbLocation,
    TaskDescription, TaskStatus, TaskUpdate,
};
use syncpilot_core::{SyncError, SyncResult};

use crate::convert;
use crate::error::{missing_field, reference_error, remote_error};
use crate::traits::DataSyncApi;

/// DataSync implementation backed by the AWS SDK
#[derive(Clone)]
pub struct AwsDataSync {
    client: DataSyncClient,
}

impl AwsDataSync {
    pub fn new(client: DataSyncClient) -> Self {
        Self { client }
    }

    async fn create_nfs(&self, l: &NfsLocation) -> SyncResult<Option<String>> {
        let output = self
            .client
            .create_location_nfs()
            .set_server_hostname(l.server_hostname.clone())
            .set_subdirectory(l.subdirectory.clone())
            .on_prem_config(convert::on_prem_config(&l.agent_arns)?)
            .set_mount_options(nfs_mount_options(l))
            .set_tags(convert::tags(&l.tags)?)
            .send()
            .await
            .map_err(|e| remote_error("CreateLocationNfs", e))?;
        Ok(output.location_arn().map(String::from))
    }

    async fn create_smb(&self, l: &SmbLocation) -> SyncResult<Option<String>> {
        let output = self
            .client
            .create_location_smb()
            .set_server_hostname(l.server_hostname.clone())
            .set_subdirectory(l.subdirectory.clone())
            .set_user(l.user.clone())
            .set_domain(l.domain.clone())
            .set_password(l.password.as_ref().map(|p| p.expose().to_string()))
            .set_agent_arns(Some(l.agent_arns.clone()))
            .set_mount_options(smb_mount_options(l))
            .set_tags(convert::tags(&l.tags)?)
            .send()
            .await
            .map_err(|e| remote_error("CreateLocationSmb", e))?;
        Ok(output.location_arn().map(String::from))
    }

    async fn create_object_storage(&self, l: &ObjectStorageLocation) -> SyncResult<Option<String>> {
        let output = self
            .client
            .create_location_object_storage()
            .set_server_hostname(l.server_hostname.clone())
            .set_bucket_name(l.bucket_name.clone())
            .set_server_port(l.server_port.map(i32::from))
            .set_server_protocol(
                l.server_protocol
                    .as_deref()
                    .map(ObjectStorageServerProtocol::from),
            )
            .set_subdirectory(l.subdirectory.clone())
            .set_access_key(l.access_key.clone())
            .set_secret_key(l.secret_key.as_ref().map(|k| k.expose().to_string()))
            .set_agent_arns(Some(l.agent_arns.clone()))
            .set_tags(convert::tags(&l.tags)?)
            .send()
            .await
            .map_err(|e| remote_error("CreateLocationObjectStorage", e))?;
        Ok(output.location_arn().map(String::from))
    }

    async fn create_s3(&self, l: &S3Location) -> SyncResult<Option<String>> {
        let role = l.bucket_access_role_arn.as_deref().unwrap_or_default();
        let output = self
            .client
            .create_location_s3()
            .set_s3_bucket_arn(l.s3_bucket_arn.clone())
            .set_subdirectory(l.subdirectory.clone())
            .set_s3_storage_class(l.s3_storage_class.as_deref().map(S3StorageClass::from))
            .s3_config(convert::s3_config(role)?)
            .set_agent_arns(convert::non_empty(&l.agent_arns))
            .set_tags(convert::tags(&l.tags)?)
            .send()
            .await
            .map_err(|e| remote_error("CreateLocationS3", e))?;
        Ok(output.location_arn().map(String::from))
    }

    async fn create_efs(&self, l: &EfsLocation) -> SyncResult<Option<String>> {
        let subnet = l.subnet_arn.as_deref().unwrap_or_default();
        let output = self
            .client
            .create_location_efs()
            .set_efs_filesystem_arn(l.efs_filesystem_arn.clone())
            .ec2_config(convert::ec2_config(subnet, &l.security_group_arns)?)
            .set_subdirectory(l.subdirectory.clone())
            .set_access_point_arn(l.access_point_arn.clone())
            .set_file_system_access_role_arn(l.file_system_access_role_arn.clone())
            .set_in_transit_encryption(
                l.in_transit_encryption
                    .as_deref()
                    .map(EfsInTransitEncryption::from),
            )
            .set_tags(convert::tags(&l.tags)?)
            .send()
            .await
            .map_err(|e| remote_error("CreateLocationEfs", e))?;
        Ok(output.location_arn().map(String::from))
    }

    async fn create_fsx_windows(&self, l: &FsxWindowsLocation) -> SyncResult<Option<String>> {
        let output = self
            .client
            .create_location_fsx_windows()
            .set_fsx_filesystem_arn(l.fsx_filesystem_arn.clone())
            .set_security_group_arns(Some(l.security_group_arns.clone()))
            .set_user(l.user.clone())
            .set_password(l.password.as_ref().map(|p| p.expose().to_string()))
            .set_domain(l.domain.clone())
            .set_subdirectory(l.subdirectory.clone())
            .set_tags(convert::tags(&l.tags)?)
            .send()
            .await
            .map_err(|e| remote_error("CreateLocationFsxWindows", e))?;
        Ok(output.location_arn().map(String::from))
    }

    async fn update_nfs(&self, arn: &str, l: &NfsLocation) -> SyncResult<()> {
        let on_prem = if l.agent_arns.is_empty() {
            None
        } else {
            Some(convert::on_prem_config(&l.agent_arns)?)
        };
        self.client
            .update_location_nfs()
            .location_arn(arn)
            .set_subdirectory(l.subdirectory.clone())
            .set_on_prem_config(on_prem)
            .set_mount_options(nfs_mount_options(l))
            .send()
            .await
            .map_err(|e| reference_error("UpdateLocationNfs", arn, e))?;
        Ok(())
    }

    async fn update_smb(&self, arn: &str, l: &SmbLocation) -> SyncResult<()> {
        self.client
            .update_location_smb()
            .location_arn(arn)
            .set_subdirectory(l.subdirectory.clone())
            .set_user(l.user.clone())
            .set_domain(l.domain.clone())
            .set_password(l.password.as_ref().map(|p| p.expose().to_string()))
            .set_agent_arns(convert::non_empty(&l.agent_arns))
            .set_mount_options(smb_mount_options(l))
            .send()
            .await
            .map_err(|e| reference_error("UpdateLocationSmb", arn, e))?;
        Ok(())
    }

    async fn update_object_storage(&self, arn: &str, l: &ObjectStorageLocation) -> SyncResult<()> {
        self.client
            .update_location_object_storage()
            .location_arn(arn)
            .set_server_port(l.server_port.map(i32::from))
            .set_server_protocol(
                l.server_protocol
                    .as_deref()
                    .map(ObjectStorageServerProtocol::from),
            )
            .set_subdirectory(l.subdirectory.clone())
            .set_access_key(l.access_key.clone())
            .set_secret_key(l.secret_key.as_ref().map(|k| k.expose().to_string()))
            .set_agent_arns(convert::non_empty(&l.agent_arns))
            .send()
            .await
            .map_err(|e| reference_error("UpdateLocationObjectStorage", arn, e))?;
        Ok(())
    }
}

fn nfs_mount_options(l: &NfsLocation) -> Option<NfsMountOptions> {
    l.mount_version.as_deref().map(|version| {
        NfsMountOptions::builder()
            .version(NfsVersion::from(version))
            .build()
    })
}

fn smb_mount_options(l: &SmbLocation) -> Option<SmbMountOptions> {
    l.mount_version.as_deref().map(|version| {
        SmbMountOptions::builder()
            .version(SmbVersion::from(version))
            .build()
    })
}

#[async_trait]
impl DataSyncApi for AwsDataSync {
    async fn create_location(&self, spec: &LocationSpec) -> SyncResult<String> {
        let kind = spec.kind();
        let arn = match spec {
            LocationSpec::Nfs(l) => self.create_nfs(l).await?,
            LocationSpec::Smb(l) => self.create_smb(l).await?,
            LocationSpec::ObjectStorage(l) => self.create_object_storage(l).await?,
            LocationSpec::S3(l) => self.create_s3(l).await?,
            LocationSpec::Efs(l) => self.create_efs(l).await?,
            LocationSpec::FsxWindows(l) => self.create_fsx_windows(l).await?,
        };
        let arn = arn.ok_or_else(|| missing_field("CreateLocation", "LocationArn"))?;

        tracing::info!(kind = %kind, location_arn = %arn, "DataSync location created");
        Ok(arn)
    }

    async fn update_location(&self, location_arn: &str, spec: &LocationSpec) -> SyncResult<()> {
        match spec {
            LocationSpec::Nfs(l) => self.update_nfs(location_arn, l).await?,
            LocationSpec::Smb(l) => self.update_smb(location_arn, l).await?,
            LocationSpec::ObjectStorage(l) => self.update_object_storage(location_arn, l).await?,
            other => {
                return Err(SyncError::config(format!(
                    "{} locations cannot be updated in place",
                    other.kind()
                )))
            }
        }

        tracing::info!(kind = %spec.kind(), location_arn = %location_arn, "DataSync location updated");
        Ok(())
    }

    async fn delete_location(&self, location_arn: &str) -> SyncResult<()> {
        self.client
            .delete_location()
            .location_arn(location_arn)
            .send()
            .await
            .map_err(|e| reference_error("DeleteLocation", location_arn, e))?;

        tracing::info!(location_arn = %location_arn, "DataSync location deleted");
        Ok(())
    }

    async fn create_task(&self, task: &NewTask) -> SyncResult<String> {
        let output = self
            .client
            .create_task()
            .source_location_arn(&task.source_location_arn)
            .destination_location_arn(&task.destination_location_arn)
            .set_name(task.name.clone())
            .set_cloud_watch_log_group_arn(task.cloudwatch_log_group_arn.clone())
            .set_options(convert::options(&task.options))
            .set_excludes(convert::filters(&task.excludes))
            .set_schedule(convert::schedule(task.schedule.as_deref())?)
            .set_tags(convert::tags(&task.tags)?)
            .send()
            .await
            .map_err(|e| remote_error("CreateTask", e))?;

        let task_arn = output
            .task_arn()
            .map(String::from)
            .ok_or_else(|| missing_field("CreateTask", "TaskArn"))?;

        tracing::info!(task_arn = %task_arn, "DataSync task created");
        Ok(task_arn)
    }

    async fn update_task(&self, update: &TaskUpdate) -> SyncResult<()> {
        self.client
            .update_task()
            .task_arn(&update.task_arn)
            .set_name(update.name.clone())
            .set_cloud_watch_log_group_arn(update.cloudwatch_log_group_arn.clone())
            .set_options(convert::options(&update.options))
            .set_excludes(convert::filters(&update.excludes))
            .set_schedule(convert::schedule(update.schedule.as_deref())?)
            .send()
            .await
            .map_err(|e| reference_error("UpdateTask", &update.task_arn, e))?;

        tracing::info!(task_arn = %update.task_arn, "DataSync task updated");
        Ok(())
    }

    async fn describe_task(&self, task_arn: &str) -> SyncResult<TaskDescription> {
        let output = self
            .client
            .describe_task()
            .task_arn(task_arn)
            .send()
            .await
            .map_err(|e| reference_error("DescribeTask", task_arn, e))?;

        let status = output
            .status()
            .map(|s| TaskStatus::from(s.as_str()))
            .ok_or_else(|| missing_field("DescribeTask", "Status"))?;

        Ok(TaskDescription {
            task_arn: output.task_arn().unwrap_or(task_arn).to_string(),
            status,
            name: output.name().map(String::from),
            source_location_arn: output.source_location_arn().map(String::from),
            destination_location_arn: output.destination_location_arn().map(String::from),
            error_code: output.error_code().map(String::from),
            error_detail: output.error_detail().map(String::from),
        })
    }

    async fn start_task_execution(
        &self,
        task_arn: &str,
        includes: &[FilterRule],
    ) -> SyncResult<String> {
        let output = self
            .client
            .start_task_execution()
            .task_arn(task_arn)
            .set_includes(convert::filters(includes))
            .send()
            .await
            .map_err(|e| reference_error("StartTaskExecution", task_arn, e))?;

        let execution_arn = output
            .task_execution_arn()
            .map(String::from)
            .ok_or_else(|| missing_field("StartTaskExecution", "TaskExecutionArn"))?;

        tracing::info!(
            task_arn = %task_arn,
            task_execution_arn = %execution_arn,
            "DataSync task execution started"
        );
        Ok(execution_arn)
    }

    async fn describe_task_execution(
        &self,
        execution_arn: &str,
    ) -> SyncResult<ExecutionDescription> {
        let output = self
            .client
            .describe_task_execution()
            .task_execution_arn(execution_arn)
            .send()
            .await
            .map_err(|e| reference_error("DescribeTaskExecution", execution_arn, e))?;

        let status = output
            .status()
            .map(|s| ExecutionStatus::from(s.as_str()))
            .ok_or_else(|| missing_field("DescribeTaskExecution", "Status"))?;

        // Counters are plain integers or optional depending on the SDK release.
        let files_transferred: Option<i64> = output.files_transferred().into();
        let bytes_transferred: Option<i64> = output.bytes_transferred().into();

        let start_time = output.start_time().and_then(convert::timestamp);
        let result = output.result();
        let total_duration_ms: Option<i64> = result.and_then(|r| r.total_duration().into());
        let end_time = match (status.is_terminal(), start_time, total_duration_ms) {
            (true, Some(start), Some(ms)) => Some(start + ChronoDuration::milliseconds(ms)),
            _ => None,
        };

        Ok(ExecutionDescription {
            execution_arn: execution_arn.to_string(),
            status,
            files_transferred: files_transferred.unwrap_or(0),
            bytes_transferred: bytes_transferred.unwrap_or(0),
            start_time,
            end_time,
            error_code: result.and_then(|r| r.error_code()).map(String::from),
            error_detail: result.and_then(|r| r.error_detail()).map(String::from),
        })
    }
}
