use crate::models::{AllocationResult, Battery, BatteryMeasurement, Version, WellTest};
use time::Date;

/// Interface for allocation algorithms.
///
/// A strategy distributes a battery's measured volumes across its wells.
/// Implementations must be pure: no I/O, no shared mutable state, and
/// identical output (including order) for identical input, so that a run
/// can be replayed or recomputed in tests without side effects. Because
/// they are stateless, one instance may be shared across concurrent
/// allocations.
pub trait AllocationStrategy: Send + Sync {
    /// The method name recorded on every result this strategy produces.
    fn name(&self) -> &str;

    /// Allocate `measurement` across the wells of `battery`.
    ///
    /// # Arguments
    ///
    /// - `day`: the production day being allocated
    /// - `battery`: the battery, whose well order is the output order
    /// - `measurement`: the measured volumes to distribute
    /// - `tests`: well tests for the day; tests for wells outside the
    ///   battery are ignored and wells without a test have zero rates
    /// - `version`: the run version to stamp on each result
    ///
    /// # Returns
    ///
    /// Exactly one result per battery well, in the battery's declared order.
    fn allocate(
        &self,
        day: Date,
        battery: &Battery,
        measurement: &BatteryMeasurement,
        tests: &[WellTest],
        version: Version,
    ) -> Vec<AllocationResult>;
}
