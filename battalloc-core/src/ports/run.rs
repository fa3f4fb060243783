use crate::models::{AllocationResult, AllocationRun, BatteryId, RunId, RunSummary, Version};
use time::Date;

/// Repository interface for persisted allocation runs.
///
/// Runs are append-only. An implementation must uphold two guarantees that
/// the allocation engine relies on but does not enforce itself:
///
/// - **Version uniqueness.** For a given (battery, day), at most one
///   `save_run` may succeed per version. Two callers that both observed the
///   same `next_version` must not both commit; the loser receives an error.
///   This is the single serialization point for concurrent allocations.
/// - **Atomicity.** `save_run` commits the run together with all of its
///   results, or nothing. A reader must never observe a run whose results
///   are partially written, including when the save future is dropped.
pub trait RunRepository: super::Repository {
    /// The version the next run for (battery, day) should receive.
    ///
    /// Returns [`Version::FIRST`] for a key with no runs, otherwise the
    /// greatest saved version plus one. This is a read; it reserves nothing.
    fn next_version(
        &self,
        battery_id: &BatteryId,
        day: Date,
    ) -> impl Future<Output = Result<Version, Self::Error>> + Send;

    /// Persist a run and all of its results as one atomic unit.
    fn save_run(&self, run: &AllocationRun) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Retrieve the results of a specific run version, in the order they were saved.
    ///
    /// Returns an empty vector if no such version exists.
    fn get_results(
        &self,
        battery_id: &BatteryId,
        day: Date,
        version: Version,
    ) -> impl Future<Output = Result<Vec<AllocationResult>, Self::Error>> + Send;

    /// Retrieve a whole run by its identifier.
    fn get_run(
        &self,
        run_id: RunId,
    ) -> impl Future<Output = Result<Option<AllocationRun>, Self::Error>> + Send;

    /// Retrieve the version history of (battery, day), in ascending version order.
    fn list_runs(
        &self,
        battery_id: &BatteryId,
        day: Date,
    ) -> impl Future<Output = Result<Vec<RunSummary>, Self::Error>> + Send;
}
