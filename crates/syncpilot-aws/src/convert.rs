//! Conversions between the run model and DataSync SDK types

use aws_sdk_datasync::primitives::DateTime as SdkDateTime;
use aws_sdk_datasync::types::{
    Atime, Ec2Config, FilterRule as SdkFilterRule, FilterType, Gid, LogLevel, Mtime, ObjectTags,
    OnPremConfig, Options, OverwriteMode, PosixPermissions, PreserveDeletedFiles,
    PreserveDevices, S3Config, SmbSecurityDescriptorCopyFlags, TagListEntry, TaskQueueing,
    TaskSchedule, TransferMode, Uid, VerifyMode,
};
use chrono::{DateTime, Utc};
use syncpilot_core::models::{FilterRule, Tags, TaskOptions};
use syncpilot_core::{SyncError, SyncResult};

fn build_error(what: &str, err: impl std::fmt::Display) -> SyncError {
    SyncError::config(format!("invalid {}: {}", what, err))
}

/// None for an empty tag map, so the request carries no tag list at all
pub(crate) fn tags(tags: &Tags) -> SyncResult<Option<Vec<TagListEntry>>> {
    if tags.is_empty() {
        return Ok(None);
    }
    tags.iter()
        .map(|(key, value)| {
            TagListEntry::builder()
                .key(key)
                .value(value)
                .build()
                .map_err(|e| build_error("tag", e))
        })
        .collect::<SyncResult<Vec<_>>>()
        .map(Some)
}

pub(crate) fn filters(rules: &[FilterRule]) -> Option<Vec<SdkFilterRule>> {
    if rules.is_empty() {
        return None;
    }
    Some(
        rules
            .iter()
            .map(|rule| {
                SdkFilterRule::builder()
                    .filter_type(FilterType::from(rule.filter_type.as_str()))
                    .value(&rule.value)
                    .build()
            })
            .collect(),
    )
}

pub(crate) fn options(options: &TaskOptions) -> Option<Options> {
    if options.is_empty() {
        return None;
    }
    Some(
        Options::builder()
            .set_verify_mode(options.verify_mode.as_deref().map(VerifyMode::from))
            .set_overwrite_mode(options.overwrite_mode.as_deref().map(OverwriteMode::from))
            .set_atime(options.atime.as_deref().map(Atime::from))
            .set_mtime(options.mtime.as_deref().map(Mtime::from))
            .set_uid(options.uid.as_deref().map(Uid::from))
            .set_gid(options.gid.as_deref().map(Gid::from))
            .set_preserve_deleted_files(
                options
                    .preserve_deleted_files
                    .as_deref()
                    .map(PreserveDeletedFiles::from),
            )
            .set_preserve_devices(options.preserve_devices.as_deref().map(PreserveDevices::from))
            .set_posix_permissions(
                options
                    .posix_permissions
                    .as_deref()
                    .map(PosixPermissions::from),
            )
            .set_bytes_per_second(options.bytes_per_second)
            .set_task_queueing(options.task_queueing.as_deref().map(TaskQueueing::from))
            .set_log_level(options.log_level.as_deref().map(LogLevel::from))
            .set_transfer_mode(options.transfer_mode.as_deref().map(TransferMode::from))
            .set_security_descriptor_copy_flags(
                options
                    .security_descriptor_copy_flags
                    .as_deref()
                    .map(SmbSecurityDescriptorCopyFlags::from),
            )
            .set_object_tags(options.object_tags.as_deref().map(ObjectTags::from))
            .build(),
    )
}

pub(crate) fn schedule(expression: Option<&str>) -> SyncResult<Option<TaskSchedule>> {
    expression
        .map(|expr| {
            TaskSchedule::builder()
                .schedule_expression(expr)
                .build()
                .map_err(|e| build_error("schedule", e))
        })
        .transpose()
}

pub(crate) fn on_prem_config(agent_arns: &[String]) -> SyncResult<OnPremConfig> {
    OnPremConfig::builder()
        .set_agent_arns(Some(agent_arns.to_vec()))
        .build()
        .map_err(|e| build_error("agent configuration", e))
}

pub(crate) fn s3_config(bucket_access_role_arn: &str) -> SyncResult<S3Config> {
    S3Config::builder()
        .bucket_access_role_arn(bucket_access_role_arn)
        .build()
        .map_err(|e| build_error("S3 access configuration", e))
}

pub(crate) fn ec2_config(subnet_arn: &str, security_group_arns: &[String]) -> SyncResult<Ec2Config> {
    Ec2Config::builder()
        .subnet_arn(subnet_arn)
        .set_security_group_arns(Some(security_group_arns.to_vec()))
        .build()
        .map_err(|e| build_error("EC2 configuration", e))
}

/// None for empty lists, which the service treats as "unchanged"
pub(crate) fn non_empty(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

pub(crate) fn timestamp(value: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}
