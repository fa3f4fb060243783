use crate::models::{BatteryId, Phases, RunId, Volume, WellId};
use std::num::NonZeroU32;
use time::{Date, OffsetDateTime};

/// The version of an allocation run within its (battery, day) key.
///
/// Versions start at 1 and strictly increase; a version is assigned to
/// exactly one run and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Version(NonZeroU32);

impl Version {
    /// The version of the first run for a key
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Construct a version, returning `None` for zero.
    pub const fn new(value: u32) -> Option<Self> {
        match NonZeroU32::new(value) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// The version as an integer (always positive)
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// The version that follows this one, if it does not overflow.
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// The version that precedes this one, or `None` for the first version.
    ///
    /// Given the *next* version of a key, this yields the latest existing one.
    pub const fn previous(self) -> Option<Self> {
        Self::new(self.0.get() - 1)
    }
}

impl TryFrom<u32> for Version {
    type Error = std::num::TryFromIntError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        NonZeroU32::try_from(value).map(Self)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The volumes allocated to one well by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocationResult {
    /// The well receiving the allocation
    pub well_id: WellId,
    /// The production day
    pub day: Date,
    /// The allocated oil, gas and water volumes
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub allocated: Phases<Volume>,
    /// The name of the strategy that produced this result
    pub method: String,
    /// The version of the run this result belongs to
    pub version: Version,
}

/// One versioned, immutable execution of an allocation strategy for a
/// (battery, day) pair.
///
/// Runs are append-only: once saved a run is never edited, and correcting
/// an allocation means executing a new run, which receives the next
/// version for the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocationRun {
    /// The run identifier
    pub id: RunId,
    /// The production day
    pub day: Date,
    /// The allocated battery
    pub battery_id: BatteryId,
    /// The name of the strategy used
    pub method: String,
    /// The run version within (battery_id, day)
    pub version: Version,
    /// When the run was executed
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub executed_at: OffsetDateTime,
    /// One result per battery well, in the battery's declared order
    pub results: Vec<AllocationResult>,
}

impl AllocationRun {
    /// The per-phase totals across every result in the run.
    pub fn totals(&self) -> Phases<Volume> {
        self.results.iter().map(|result| result.allocated).sum()
    }

    /// The header of this run, without its results.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            id: self.id,
            version: self.version,
            method: self.method.clone(),
            executed_at: self.executed_at,
        }
    }
}

/// An entry in the version history of a (battery, day) key.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// The run identifier
    pub id: RunId,
    /// The run version
    pub version: Version,
    /// The name of the strategy used
    pub method: String,
    /// When the run was executed
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub executed_at: OffsetDateTime,
}
