//! Tracing initialization
//!
//! Every run logs to stderr and appends to a plain-text log file
//! (`output.log` in the working directory unless overridden).

mod init_basic;

pub use init_basic::{build_file_writer, init_telemetry, shutdown_telemetry, TelemetryGuard};
