mod battery;
mod measurement;
mod run;
mod strategy;

pub use battery::BatteryRepository;
pub use measurement::MeasurementRepository;
pub use run::RunRepository;
pub use strategy::AllocationStrategy;
pub use well_test::WellTestRepository;

/// Base repository trait shared by every storage port.
///
/// Each port is a separate trait so that an adapter (or a test double) only
/// has to implement what a caller needs, but all of them report failures
/// through the same associated error type. Errors here are infrastructure
/// failures; a record that simply does not exist is reported as `None` or
/// an empty collection, never as an error.
pub trait Repository: Send + Sync {
    /// The error type for underlying storage operations
    type Error: std::error::Error + Send + Sync + 'static;
}

/// The "marker" trait for a storage adapter implementing every port the
/// allocation engine needs.
pub trait AllocationRepository:
    BatteryRepository + MeasurementRepository + WellTestRepository + RunRepository
{
}

impl<T> AllocationRepository for T where
    T: BatteryRepository + MeasurementRepository + WellTestRepository + RunRepository
{
}
