//! Execution of parsed commands.

use crate::{AllocationConfig, CliApp, Commands};
use battalloc_core::{
    models::{BatteryId, Reconcile, RunAllocation},
    ports::RunRepository as _,
};
use battalloc_engine::{reconcile, run_allocation};
use battalloc_sqlite::ReferenceData;
use std::{io::Write, process::ExitCode};
use tracing::{Level, event};

/// How a successfully executed command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command did what was asked
    Success,
    /// A reconciliation found a phase outside the threshold
    OutsideThreshold,
}

impl From<Outcome> for ExitCode {
    fn from(value: Outcome) -> Self {
        match value {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::OutsideThreshold => ExitCode::from(2),
        }
    }
}

/// Execute `command`, writing its output to `out`.
///
/// Refused requests (an unknown battery, a missing run, an invalid field)
/// are returned as errors, as are storage failures.
pub async fn execute(
    app: &CliApp,
    config: &AllocationConfig,
    command: Commands,
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    match command {
        Commands::Import { file } => {
            let document = std::fs::read_to_string(&file)?;
            let data: ReferenceData = serde_json::from_str(&document)?;
            let summary = app.db.load(&data).await?;
            serde_json::to_writer_pretty(&mut *out, &summary)?;
            writeln!(out)?;
        }

        Commands::Run {
            battery,
            day,
            method,
        } => {
            let method = method.unwrap_or_else(|| config.default_method.clone());
            let command = RunAllocation::new(day, battery, method)?;
            let run_id = run_allocation(app, command).await??;
            writeln!(out, "{run_id}")?;
        }

        Commands::Reconcile {
            battery,
            day,
            threshold,
        } => {
            let threshold = threshold.unwrap_or(config.variance_threshold_pct);
            let command = Reconcile::new(day, battery, threshold)?;
            let summary = reconcile(app, command).await??;
            serde_json::to_writer_pretty(&mut *out, &summary)?;
            writeln!(out)?;
            if !summary.within_threshold {
                event!(
                    Level::WARN,
                    battery_id = %summary.battery_id,
                    day = %summary.day,
                    "allocation is outside the variance threshold"
                );
                return Ok(Outcome::OutsideThreshold);
            }
        }

        Commands::Show { run } => {
            let run = app
                .db
                .get_run(run)
                .await?
                .ok_or_else(|| anyhow::anyhow!("run {run} not found"))?;
            serde_json::to_writer_pretty(&mut *out, &run)?;
            writeln!(out)?;
        }

        Commands::History { battery, day } => {
            let battery_id = BatteryId::new(battery)?;
            let history = app.db.list_runs(&battery_id, day).await?;
            serde_json::to_writer_pretty(&mut *out, &history)?;
            writeln!(out)?;
        }
    }
    Ok(Outcome::Success)
}
