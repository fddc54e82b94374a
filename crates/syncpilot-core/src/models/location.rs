//! Location descriptors
//!
//! A location is a storage endpoint registered with DataSync. The descriptor
//! is tagged by `type`; each kind carries its own connection fields. Fields
//! that the service requires on creation are optional here because an update
//! of an existing location only sends what changed. [`LocationSpec::missing_create_fields`]
//! reports which required fields are absent before a create call.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Resource tags, key to value
pub type Tags = BTreeMap<String, String>;

/// A credential value whose `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Kind of a storage location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    Nfs,
    Smb,
    ObjectStorage,
    S3,
    Efs,
    FsxWindows,
}

impl LocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationKind::Nfs => "nfs",
            LocationKind::Smb => "smb",
            LocationKind::ObjectStorage => "object_storage",
            LocationKind::S3 => "s3",
            LocationKind::Efs => "efs",
            LocationKind::FsxWindows => "fsx_windows",
        }
    }

    /// Whether DataSync can modify an existing location of this kind in place
    pub fn supports_update(&self) -> bool {
        matches!(
            self,
            LocationKind::Nfs | LocationKind::Smb | LocationKind::ObjectStorage
        )
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A location as written in the run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDescriptor {
    /// ARN of an existing location. When set the location is updated instead of created.
    #[serde(default, deserialize_with = "non_blank")]
    pub location_arn: Option<String>,
    #[serde(flatten)]
    pub spec: LocationSpec,
}

impl LocationDescriptor {
    pub fn kind(&self) -> LocationKind {
        self.spec.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LocationSpec {
    Nfs(NfsLocation),
    Smb(SmbLocation),
    ObjectStorage(ObjectStorageLocation),
    S3(S3Location),
    Efs(EfsLocation),
    FsxWindows(FsxWindowsLocation),
}

impl LocationSpec {
    pub fn kind(&self) -> LocationKind {
        match self {
            LocationSpec::Nfs(_) => LocationKind::Nfs,
            LocationSpec::Smb(_) => LocationKind::Smb,
            LocationSpec::ObjectStorage(_) => LocationKind::ObjectStorage,
            LocationSpec::S3(_) => LocationKind::S3,
            LocationSpec::Efs(_) => LocationKind::Efs,
            LocationSpec::FsxWindows(_) => LocationKind::FsxWindows,
        }
    }

    /// Names of fields the service requires to create a location of this kind
    /// that are absent from the descriptor.
    pub fn missing_create_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let mut need = |present: bool, name: &'static str| {
            if !present {
                missing.push(name);
            }
        };

        match self {
            LocationSpec::Nfs(l) => {
                need(is_set(&l.server_hostname), "server_hostname");
                need(is_set(&l.subdirectory), "subdirectory");
                need(!l.agent_arns.is_empty(), "agent_arns");
            }
            LocationSpec::Smb(l) => {
                need(is_set(&l.server_hostname), "server_hostname");
                need(is_set(&l.subdirectory), "subdirectory");
                need(is_set(&l.user), "user");
                need(l.password.is_some(), "password");
                need(!l.agent_arns.is_empty(), "agent_arns");
            }
            LocationSpec::ObjectStorage(l) => {
                need(is_set(&l.server_hostname), "server_hostname");
                need(is_set(&l.bucket_name), "bucket_name");
                need(!l.agent_arns.is_empty(), "agent_arns");
            }
            LocationSpec::S3(l) => {
                need(is_set(&l.s3_bucket_arn), "s3_bucket_arn");
                need(is_set(&l.bucket_access_role_arn), "bucket_access_role_arn");
            }
            LocationSpec::Efs(l) => {
                need(is_set(&l.efs_filesystem_arn), "efs_filesystem_arn");
                need(is_set(&l.subnet_arn), "subnet_arn");
                need(!l.security_group_arns.is_empty(), "security_group_arns");
            }
            LocationSpec::FsxWindows(l) => {
                need(is_set(&l.fsx_filesystem_arn), "fsx_filesystem_arn");
                need(!l.security_group_arns.is_empty(), "security_group_arns");
                need(is_set(&l.user), "user");
                need(l.password.is_some(), "password");
            }
        }

        missing
    }
}

/// Optional identifier where a blank string counts as absent
pub(crate) fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// NFS share reached through one or more agents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NfsLocation {
    #[serde(default, alias = "hostname")]
    pub server_hostname: Option<String>,
    #[serde(default)]
    pub subdirectory: Option<String>,
    #[serde(default)]
    pub agent_arns: Vec<String>,
    /// AUTOMATIC, NFS3, NFS4_0 or NFS4_1
    #[serde(default)]
    pub mount_version: Option<String>,
    #[serde(default)]
    pub tags: Tags,
}

/// SMB share reached through one or more agents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmbLocation {
    #[serde(default, alias = "hostname")]
    pub server_hostname: Option<String>,
    #[serde(default)]
    pub subdirectory: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub password: Option<Secret>,
    #[serde(default)]
    pub agent_arns: Vec<String>,
    /// AUTOMATIC, SMB1, SMB2, SMB2_0 or SMB3
    #[serde(default)]
    pub mount_version: Option<String>,
    #[serde(default)]
    pub tags: Tags,
}

/// Self-managed object storage with an S3-compatible API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectStorageLocation {
    #[serde(default, alias = "hostname")]
    pub server_hostname: Option<String>,
    #[serde(default, alias = "bucket")]
    pub bucket_name: Option<String>,
    #[serde(default)]
    pub agent_arns: Vec<String>,
    #[serde(default)]
    pub server_port: Option<u16>,
    /// HTTP or HTTPS
    #[serde(default)]
    pub server_protocol: Option<String>,
    #[serde(default)]
    pub subdirectory: Option<String>,
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub secret_key: Option<Secret>,
    #[serde(default)]
    pub tags: Tags,
}

/// Amazon S3 bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct S3Location {
    #[serde(default, alias = "arn", alias = "bucket_arn")]
    pub s3_bucket_arn: Option<String>,
    #[serde(default, alias = "access_role_arn")]
    pub bucket_access_role_arn: Option<String>,
    #[serde(default)]
    pub subdirectory: Option<String>,
    #[serde(default)]
    pub s3_storage_class: Option<String>,
    /// Only used for S3 on Outposts
    #[serde(default)]
    pub agent_arns: Vec<String>,
    #[serde(default)]
    pub tags: Tags,
}

/// Amazon EFS file system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EfsLocation {
    #[serde(default)]
    pub efs_filesystem_arn: Option<String>,
    #[serde(default)]
    pub subnet_arn: Option<String>,
    #[serde(default)]
    pub security_group_arns: Vec<String>,
    #[serde(default)]
    pub subdirectory: Option<String>,
    #[serde(default)]
    pub access_point_arn: Option<String>,
    #[serde(default)]
    pub file_system_access_role_arn: Option<String>,
    /// NONE or TLS1_2
    #[serde(default)]
    pub in_transit_encryption: Option<String>,
    #[serde(default)]
    pub tags: Tags,
}

/// Amazon FSx for Windows File Server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FsxWindowsLocation {
    #[serde(default)]
    pub fsx_filesystem_arn: Option<String>,
    #[serde(default)]
    pub security_group_arns: Vec<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<Secret>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub subdirectory: Option<String>,
    #[serde(default)]
    pub tags: Tags,
}
