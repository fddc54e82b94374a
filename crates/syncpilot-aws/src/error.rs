//! SDK error mapping

use aws_sdk_datasync::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use std::error::Error as StdError;
use std::fmt::Debug;
use syncpilot_core::SyncError;

const INVALID_REQUEST: &str = "InvalidRequestException";

/// Map a failed call to `SyncError::Remote`, keeping the full error context.
pub(crate) fn remote_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> SyncError
where
    E: StdError + ProvideErrorMetadata + 'static,
    R: Debug,
{
    tracing::error!(
        operation = operation,
        error_code = err.code().unwrap_or("unknown"),
        "AWS request failed"
    );
    SyncError::Remote {
        operation,
        message: DisplayErrorContext(&err).to_string(),
    }
}

/// Like [`remote_error`], but an invalid-request answer to a call targeting an
/// existing resource means the ARN was rejected.
pub(crate) fn reference_error<E, R>(
    operation: &'static str,
    arn: &str,
    err: SdkError<E, R>,
) -> SyncError
where
    E: StdError + ProvideErrorMetadata + 'static,
    R: Debug,
{
    if err.code() == Some(INVALID_REQUEST) {
        let detail = err.message().unwrap_or("invalid request").to_string();
        tracing::error!(operation = operation, arn = %arn, detail = %detail, "ARN rejected");
        return SyncError::InvalidReference(format!("{} rejected {}: {}", operation, arn, detail));
    }
    remote_error(operation, err)
}

/// An SDK response was missing a field the service always returns
pub(crate) fn missing_field(operation: &'static str, field: &str) -> SyncError {
    SyncError::Remote {
        operation,
        message: format!("response did not include {}", field),
    }
}
