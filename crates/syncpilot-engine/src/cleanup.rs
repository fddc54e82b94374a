//! Removal of locations created by a run

use syncpilot_aws::DataSyncApi;
use syncpilot_core::SyncResult;

/// Delete each location in `created`, in order. Stops at the first failure.
pub async fn delete_created_locations(
    datasync: &dyn DataSyncApi,
    created: &[String],
) -> SyncResult<usize> {
    if created.is_empty() {
        tracing::debug!("No locations created by this run, nothing to clean up");
        return Ok(0);
    }

    for location_arn in created {
        tracing::info!(location_arn = %location_arn, "Deleting location created by this run");
        datasync.delete_location(location_arn).await?;
    }

    tracing::info!(deleted = created.len(), "Cleanup finished");
    Ok(created.len())
}
