//! syncpilot core library
//!
//! Configuration, data model, error types and lifecycle hooks shared by the
//! AWS adapters, the run engine and the CLI.

pub mod config;
pub mod error;
pub mod hooks;
pub mod models;

// Re-export commonly used types
pub use config::{
    CleanupConfig, HookCommands, NotificationConfig, PollingConfig, RunConfig, Settings,
    DEFAULT_POLL_INTERVAL_SECS,
};
pub use error::{LogLevel, SyncError, SyncResult};
pub use hooks::{HookRegistry, HookStage, NoOpHooks, RunHooks};
