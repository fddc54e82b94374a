//! Location resolution
//!
//! A descriptor with a `location_arn` is updated in place, one without is
//! created. Either way exactly one mutating call is made, after all local
//! checks have passed.

use std::sync::Arc;
use syncpilot_aws::DataSyncApi;
use syncpilot_core::models::{LocationDescriptor, LocationKind};
use syncpilot_core::{SyncError, SyncResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub arn: String,
    pub kind: LocationKind,
    /// Whether this run created the location
    pub created: bool,
}

#[derive(Clone)]
pub struct LocationResolver {
    datasync: Arc<dyn DataSyncApi>,
}

impl LocationResolver {
    pub fn new(datasync: Arc<dyn DataSyncApi>) -> Self {
        Self { datasync }
    }

    /// Local checks only. `role` names the location in error messages.
    pub fn check(role: &str, descriptor: &LocationDescriptor) -> SyncResult<()> {
        let kind = descriptor.kind();

        if descriptor.location_arn.is_some() {
            if !kind.supports_update() {
                return Err(SyncError::config(format!(
                    "{} location of type {} has a location_arn, but {} locations cannot be updated",
                    role, kind, kind
                )));
            }
            return Ok(());
        }

        let missing = descriptor.spec.missing_create_fields();
        if !missing.is_empty() {
            return Err(SyncError::config(format!(
                "{} location of type {} is missing required fields: {}",
                role,
                kind,
                missing.join(", ")
            )));
        }

        Ok(())
    }

    pub async fn resolve(
        &self,
        role: &str,
        descriptor: &LocationDescriptor,
    ) -> SyncResult<ResolvedLocation> {
        Self::check(role, descriptor)?;
        let kind = descriptor.kind();

        match &descriptor.location_arn {
            Some(arn) => {
                tracing::info!(role = role, kind = %kind, location_arn = %arn, "Updating location");
                self.datasync.update_location(arn, &descriptor.spec).await?;
                Ok(ResolvedLocation {
                    arn: arn.clone(),
                    kind,
                    created: false,
                })
            }
            None => {
                tracing::info!(role = role, kind = %kind, "Creating location");
                let arn = self.datasync.create_location(&descriptor.spec).await?;
                tracing::info!(role = role, location_arn = %arn, "Location created");
                Ok(ResolvedLocation {
                    arn,
                    kind,
                    created: true,
                })
            }
        }
    }
}
