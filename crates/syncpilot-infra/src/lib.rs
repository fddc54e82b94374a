//! syncpilot infrastructure
//!
//! Process-wide concerns shared by the binaries. Currently this is the
//! tracing setup writing to the console and to the run log file.

pub mod telemetry;

pub use telemetry::{init_telemetry, shutdown_telemetry, TelemetryGuard};
