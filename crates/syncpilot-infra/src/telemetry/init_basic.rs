use anyhow::Context;
use std::fs;
use syncpilot_core::Settings;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Keeps the background log writer alive. Dropping it flushes the log file.
#[must_use = "dropping the guard stops the file writer"]
pub struct TelemetryGuard {
    _file_guard: WorkerGuard,
}

/// Non-blocking writer appending to `settings.log_path()`.
///
/// The directory is created when missing. The file is never rotated.
pub fn build_file_writer(settings: &Settings) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(&settings.log_dir).with_context(|| {
        format!(
            "failed to create log directory {}",
            settings.log_dir.display()
        )
    })?;

    let appender = tracing_appender::rolling::never(&settings.log_dir, &settings.log_file);
    Ok(tracing_appender::non_blocking(appender))
}

/// Install the global subscriber: `RUST_LOG` filter (default `info`),
/// a console layer and a log file layer.
pub fn init_telemetry(settings: &Settings) -> anyhow::Result<TelemetryGuard> {
    let (file_writer, file_guard) = build_file_writer(settings)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(file_writer),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::debug!(log_file = %settings.log_path().display(), "Logging initialized");
    Ok(TelemetryGuard {
        _file_guard: file_guard,
    })
}

/// Flush pending log lines
pub fn shutdown_telemetry(guard: TelemetryGuard) {
    tracing::debug!("Telemetry shutdown");
    drop(guard);
}
