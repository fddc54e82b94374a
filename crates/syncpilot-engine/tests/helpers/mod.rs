#![allow(dead_code)]

pub mod clock;
pub mod fixtures;
pub mod mock_datasync;
pub mod mock_publisher;

pub use clock::ManualClock;
pub use fixtures::*;
pub use mock_datasync::{Call, MockDataSync};
pub use mock_publisher::{PublishedMessage, RecordingPublisher};
