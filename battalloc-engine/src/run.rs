use crate::{AllocationFailure, Application, RepositoryError};
use battalloc_core::{
    models::{AllocationResult, AllocationRun, Battery, RunAllocation, RunId, WellId},
    ports::{
        BatteryRepository as _, MeasurementRepository as _, RunRepository as _,
        WellTestRepository as _,
    },
};
use tracing::{Instrument as _, Level, event, span};

/// Allocate a battery's measured production for one day across its wells.
///
/// The battery and its measurement must exist; well tests may cover only
/// some (or none) of the battery's wells. The method is resolved against
/// the application's strategy registry, so an unknown method either falls
/// back to the default strategy or is refused, depending on the registry's
/// policy. The run is stamped with the next version for (battery, day) and
/// saved as one unit.
///
/// # Returns
///
/// - `Ok(Ok(run_id))` once the run has been persisted
/// - `Ok(Err(failure))` if the request was refused; nothing was saved
/// - `Err(error)` if the repository failed, including when another run for
///   the same (battery, day) claimed the version first
pub async fn run_allocation<A: Application>(
    app: &A,
    command: RunAllocation,
) -> Result<Result<RunId, AllocationFailure>, RepositoryError<A>> {
    let span = span!(
        Level::INFO,
        "run_allocation",
        battery_id = %command.battery_id,
        day = %command.day,
        method = %command.method,
    );
    execute(app, command).instrument(span).await
}

async fn execute<A: Application>(
    app: &A,
    command: RunAllocation,
) -> Result<Result<RunId, AllocationFailure>, RepositoryError<A>> {
    if let Err(error) = command.validate() {
        return Ok(Err(error.into()));
    }
    let RunAllocation {
        day,
        battery_id,
        method,
    } = command;
    let db = app.database();

    let Some(battery) = db.get_battery(&battery_id).await? else {
        return Ok(Err(AllocationFailure::BatteryNotFound(battery_id)));
    };
    let Some(measurement) = db.get_measurement(&battery_id, day).await? else {
        return Ok(Err(AllocationFailure::MeasurementNotFound { battery_id, day }));
    };

    let wells: Vec<WellId> = battery.wells().iter().cloned().collect();
    let tests = db.get_well_tests(&wells, day).await?;
    event!(
        Level::DEBUG,
        wells = wells.len(),
        tests = tests.len(),
        "loaded well tests"
    );

    let strategy = match app.strategies().resolve(&method) {
        Ok(strategy) => strategy,
        Err(unknown) => return Ok(Err(unknown.into())),
    };

    let version = db.next_version(&battery_id, day).await?;
    let results = strategy.allocate(day, &battery, &measurement, &tests, version);

    let mismatched = mismatched_wells(&battery, &results);
    if !mismatched.is_empty() {
        event!(
            Level::ERROR,
            method = strategy.name(),
            mismatched = mismatched.len(),
            "strategy output does not cover the battery"
        );
        return Ok(Err(AllocationFailure::IncompleteAllocation {
            battery_id,
            method: strategy.name().to_owned(),
            mismatched,
        }));
    }

    let run = AllocationRun {
        id: app.generate_run_id(),
        day,
        battery_id,
        method: strategy.name().to_owned(),
        version,
        executed_at: app.now(),
        results,
    };
    db.save_run(&run).await?;

    event!(Level::INFO, run_id = %run.id, version = %run.version, "allocation run saved");
    Ok(Ok(run.id))
}

/// Wells whose result is missing or out of place, followed by any surplus results.
fn mismatched_wells(battery: &Battery, results: &[AllocationResult]) -> Vec<WellId> {
    let wells = battery.wells();
    let mut mismatched: Vec<WellId> = wells
        .iter()
        .enumerate()
        .filter(|&(index, well_id)| {
            results
                .get(index)
                .is_none_or(|result| &result.well_id != well_id)
        })
        .map(|(_, well_id)| well_id.clone())
        .collect();
    mismatched.extend(
        results
            .iter()
            .skip(wells.len())
            .map(|result| result.well_id.clone()),
    );
    mismatched
}

#[cfg(test)]
mod tests {
    use super::*;
    use battalloc_core::models::{BatteryId, Phases, Version, Volume};
    use time::macros::date;

    fn well(id: &str) -> WellId {
        WellId::new(id).unwrap()
    }

    fn result(id: &str) -> AllocationResult {
        AllocationResult {
            well_id: well(id),
            day: date!(2024 - 01 - 01),
            allocated: Phases::splat(Volume::ZERO),
            method: "m".to_owned(),
            version: Version::FIRST,
        }
    }

    #[test]
    fn test_mismatched_wells() {
        let battery = Battery::new(
            BatteryId::new("B1").unwrap(),
            "",
            "",
            ["W1", "W2", "W3"].map(well),
        )
        .unwrap();

        let exact = ["W1", "W2", "W3"].map(result);
        assert!(mismatched_wells(&battery, &exact).is_empty());

        let short = ["W1", "W2"].map(result);
        assert_eq!(mismatched_wells(&battery, &short), [well("W3")]);

        let swapped = ["W1", "W3", "W2"].map(result);
        assert_eq!(mismatched_wells(&battery, &swapped), [well("W2"), well("W3")]);

        let surplus = ["W1", "W2", "W3", "X"].map(result);
        assert_eq!(mismatched_wells(&battery, &surplus), [well("X")]);
    }
}
