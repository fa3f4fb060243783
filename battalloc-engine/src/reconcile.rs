use crate::{AllocationFailure, Application, RepositoryError};
use battalloc_core::{
    models::{Phases, Reconcile, ReconciliationSummary, Volume},
    ports::{MeasurementRepository as _, RunRepository as _},
};
use tracing::{Instrument as _, Level, event, span};

/// Compare the latest allocation run of a battery/day against its measurement.
///
/// The latest run is the one whose version precedes the key's next version.
/// This only reads, so it may run concurrently with new allocations; it
/// reconciles whichever run was latest when the version was read.
///
/// # Returns
///
/// - `Ok(Ok(summary))` with per-phase variance and the threshold verdict
/// - `Ok(Err(failure))` if the measurement or run does not exist, or the
///   threshold is invalid
/// - `Err(error)` if the repository failed
pub async fn reconcile<A: Application>(
    app: &A,
    command: Reconcile,
) -> Result<Result<ReconciliationSummary, AllocationFailure>, RepositoryError<A>> {
    let span = span!(
        Level::INFO,
        "reconcile",
        battery_id = %command.battery_id,
        day = %command.day,
        threshold = command.variance_pct_threshold,
    );
    execute(app, command).instrument(span).await
}

async fn execute<A: Application>(
    app: &A,
    command: Reconcile,
) -> Result<Result<ReconciliationSummary, AllocationFailure>, RepositoryError<A>> {
    if let Err(error) = command.validate() {
        return Ok(Err(error.into()));
    }
    let Reconcile {
        day,
        battery_id,
        variance_pct_threshold,
    } = command;
    let db = app.database();

    let Some(measurement) = db.get_measurement(&battery_id, day).await? else {
        return Ok(Err(AllocationFailure::MeasurementNotFound { battery_id, day }));
    };

    let next = db.next_version(&battery_id, day).await?;
    let Some(version) = next.previous() else {
        return Ok(Err(AllocationFailure::RunNotFound { battery_id, day }));
    };

    let results = db.get_results(&battery_id, day, version).await?;
    if results.is_empty() {
        return Ok(Err(AllocationFailure::EmptyRun {
            battery_id,
            day,
            version,
        }));
    }

    let allocated: Phases<Volume> = results.iter().map(|result| result.allocated).sum();
    let summary = ReconciliationSummary::evaluate(
        battery_id,
        day,
        version,
        measurement.measured,
        allocated,
        variance_pct_threshold,
    );

    event!(
        Level::INFO,
        version = %summary.version,
        oil = summary.variance_pct.oil,
        gas = summary.variance_pct.gas,
        water = summary.variance_pct.water,
        within_threshold = summary.within_threshold,
        "reconciled"
    );
    Ok(Ok(summary))
}
