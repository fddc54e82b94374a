//! syncpilot run engine
//!
//! Drives one DataSync run end to end:
//! - [`LocationResolver`]: create or update the source and destination
//! - [`TaskManager`]: create or update the task
//! - [`ExecutionPoller`]: wait for the task, start one execution, poll it
//! - [`Notifier`]: publish the rendered success or failure message
//! - [`cleanup`]: delete the locations the run created
//!
//! [`SyncRunner`] chains them and calls the [`RunHooks`](syncpilot_core::RunHooks)
//! at each stage.

pub mod cleanup;
pub mod clock;
pub mod command_hooks;
pub mod notifier;
pub mod poller;
pub mod resolver;
pub mod runner;
pub mod task_manager;

pub use clock::{Clock, SystemClock};
pub use command_hooks::CommandHooks;
pub use notifier::{render_template, NotificationContext, Notifier};
pub use poller::{ExecutionOutcome, ExecutionPoller};
pub use resolver::{LocationResolver, ResolvedLocation};
pub use runner::{RunOutcome, RunReport, SyncRunner};
pub use task_manager::{ConfiguredTask, TaskManager};
