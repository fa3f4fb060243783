use battalloc_core::{models::RunId, ports::AllocationRepository};
use battalloc_strategy::StrategyRegistry;
use time::OffsetDateTime;

/// Everything an allocation operation needs from its host.
///
/// Implementors are typically a cheap, cloneable handle around a database
/// connection and the strategy registry built at startup. Tests supply the
/// clock and the id generator to make runs reproducible.
pub trait Application: Send + Sync {
    /// The storage adapter implementing every repository port
    type Repository: AllocationRepository;

    /// Get a reference to the storage adapter
    fn database(&self) -> &Self::Repository;

    /// Get the strategies runs are resolved against
    fn strategies(&self) -> &StrategyRegistry;

    /// The execution timestamp stamped on new runs
    fn now(&self) -> OffsetDateTime;

    /// Produce a fresh identifier for a new run
    fn generate_run_id(&self) -> RunId;
}
