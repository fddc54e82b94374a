//! Client construction from process settings

use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::sync::Arc;
use syncpilot_core::Settings;

use crate::datasync::AwsDataSync;
use crate::sns::SnsPublisher;
use crate::traits::{DataSyncApi, NotificationPublisher};

/// Remote service handles used by a run
#[derive(Clone)]
pub struct AwsClients {
    pub datasync: Arc<dyn DataSyncApi>,
    pub publisher: Arc<dyn NotificationPublisher>,
}

/// Load the shared SDK configuration.
///
/// Credentials and region follow the standard AWS resolution chain, with
/// `SYNCPILOT_AWS_REGION` and `SYNCPILOT_AWS_ENDPOINT_URL` taking precedence.
/// Each call is attempted once; a failed request fails the run.
pub async fn load_sdk_config(settings: &Settings) -> SdkConfig {
    let region_provider = RegionProviderChain::first_try(settings.aws_region.clone().map(Region::new))
        .or_default_provider();

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .retry_config(RetryConfig::standard().with_max_attempts(1));

    if let Some(endpoint) = &settings.aws_endpoint_url {
        tracing::info!(endpoint = %endpoint, "Using custom AWS endpoint");
        loader = loader.endpoint_url(endpoint);
    }

    let config = loader.load().await;
    tracing::debug!(
        region = config.region().map(|r| r.as_ref()).unwrap_or("unset"),
        "AWS configuration loaded"
    );
    config
}

/// Build the DataSync and SNS clients
pub async fn create_clients(settings: &Settings) -> AwsClients {
    let config = load_sdk_config(settings).await;

    AwsClients {
        datasync: Arc::new(AwsDataSync::new(aws_sdk_datasync::Client::new(&config))),
        publisher: Arc::new(SnsPublisher::new(aws_sdk_sns::Client::new(&config))),
    }
}
