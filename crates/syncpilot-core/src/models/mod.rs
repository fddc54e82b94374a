pub mod execution;
pub mod location;
pub mod task;

pub use execution::{ExecutionDescription, ExecutionStatus};
pub use location::{
    EfsLocation, FsxWindowsLocation, LocationDescriptor, LocationKind, LocationSpec, NfsLocation,
    ObjectStorageLocation, S3Location, Secret, SmbLocation, Tags,
};
pub use task::{FilterRule, NewTask, TaskDescription, TaskOptions, TaskStatus, TaskUpdate};
