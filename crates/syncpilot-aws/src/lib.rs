//! syncpilot AWS adapters
//!
//! This crate defines the remote-service seams used by the run engine and
//! their AWS SDK implementations:
//!
//! - [`DataSyncApi`]: locations, tasks and task executions ([`AwsDataSync`])
//! - [`NotificationPublisher`]: completion messages ([`SnsPublisher`])
//!
//! The engine only talks to the traits, so tests swap in in-memory doubles.

mod convert;
pub mod datasync;
mod error;
pub mod factory;
pub mod sns;
pub mod traits;

// Re-export commonly used types
pub use datasync::AwsDataSync;
pub use factory::{create_clients, load_sdk_config, AwsClients};
pub use sns::SnsPublisher;
pub use traits::{DataSyncApi, NotificationPublisher};
