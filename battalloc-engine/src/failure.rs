use battalloc_core::models::{BatteryId, ValidationError, Version, WellId};
use battalloc_strategy::UnknownMethod;
use thiserror::Error;
use time::Date;

/// The reasons an allocation operation may refuse a request.
///
/// These are domain outcomes, reported inside an `Ok` from the storage
/// layer's point of view; nothing has been written when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationFailure {
    /// A required field was missing or malformed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested method is unknown and the registry rejects unknown methods
    #[error(transparent)]
    UnknownMethod(#[from] UnknownMethod),

    /// The battery does not exist
    #[error("battery {0} not found")]
    BatteryNotFound(BatteryId),

    /// There is no measurement for the battery on the day
    #[error("no measurement for battery {battery_id} on {day}")]
    MeasurementNotFound {
        /// The battery
        battery_id: BatteryId,
        /// The production day
        day: Date,
    },

    /// There is no allocation run for the battery on the day
    #[error("no allocation run for battery {battery_id} on {day}")]
    RunNotFound {
        /// The battery
        battery_id: BatteryId,
        /// The production day
        day: Date,
    },

    /// The latest run exists but has no results
    #[error("run version {version} of battery {battery_id} on {day} has no results")]
    EmptyRun {
        /// The battery
        battery_id: BatteryId,
        /// The production day
        day: Date,
        /// The version found
        version: Version,
    },

    /// The strategy did not produce exactly one result per battery well, in order
    #[error("strategy `{method}` did not allocate exactly the wells of battery {battery_id}")]
    IncompleteAllocation {
        /// The battery
        battery_id: BatteryId,
        /// The strategy used
        method: String,
        /// Battery wells with no result at their position, or results for other wells
        mismatched: Vec<WellId>,
    },
}

/// The broad class of an [`AllocationFailure`], for mapping onto an outer
/// protocol (exit codes, status codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Something the request refers to does not exist
    NotFound,
    /// The request itself is unacceptable
    Validation,
    /// A collaborator broke its contract
    Internal,
}

impl AllocationFailure {
    /// Classify this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) | Self::UnknownMethod(_) => FailureKind::Validation,
            Self::BatteryNotFound(_)
            | Self::MeasurementNotFound { .. }
            | Self::RunNotFound { .. }
            | Self::EmptyRun { .. } => FailureKind::NotFound,
            Self::IncompleteAllocation { .. } => FailureKind::Internal,
        }
    }
}
