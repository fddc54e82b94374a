//! syncpilot: create or update a DataSync task, run one execution, report it.
//!
//! Process settings come from `SYNCPILOT_*` variables (and `.env`), the run
//! itself from the file passed with `-c/--config-file`.

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use syncpilot_aws::create_clients;
use syncpilot_cli::{exit_status, hooks_for, log_fatal, Cli};
use syncpilot_core::{Settings, SyncResult};
use syncpilot_engine::{RunOutcome, SyncRunner};
use syncpilot_infra::{init_telemetry, shutdown_telemetry};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = Settings::from_env().context("failed to read SYNCPILOT_* settings")?;
    let guard = init_telemetry(&settings)?;

    let result = run(&cli, &settings).await;
    let status = match &result {
        Ok(outcome) => exit_status(outcome),
        Err(_) => 1,
    };
    tracing::info!(exit_status = status, "syncpilot finished");
    shutdown_telemetry(guard);

    result
        .map(|_| ExitCode::from(status))
        .with_context(|| format!("run configured by {} failed", cli.config_file.display()))
}

async fn execute(cli: &Cli, settings: &Settings) -> SyncResult<RunOutcome> {
    let config = cli.load_config()?;
    tracing::info!(
        config_file = %cli.config_file.display(),
        config = ?config,
        "Configuration loaded"
    );

    let clients = create_clients(settings).await;
    let runner =
        SyncRunner::new(clients.datasync, clients.publisher).with_hooks(hooks_for(&config));
    runner.run(&config).await
}

async fn run(cli: &Cli, settings: &Settings) -> SyncResult<RunOutcome> {
    let result = execute(cli, settings).await;

    match &result {
        Ok(RunOutcome::Completed(report)) => tracing::info!(
            task_arn = %report.task_arn,
            task_execution_arn = %report.execution.execution_arn,
            status = %report.execution.status,
            files_transferred = report.execution.files_transferred,
            "Run completed"
        ),
        Ok(RunOutcome::Aborted { stage, task_arn }) => tracing::warn!(
            stage = %stage,
            task_arn = task_arn.as_deref().unwrap_or("none"),
            "Run aborted by hook"
        ),
        Err(err) => log_fatal(err),
    }

    result
}
