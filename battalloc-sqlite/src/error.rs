use battalloc_core::models::{BatteryId, Version};
use thiserror::Error;
use time::Date;

/// Database operations fail for several reasons; this is the unified error
/// type every repository method returns.
#[derive(Debug, Error)]
pub enum Error {
    /// Error from SQLite operations
    #[error("sql error: {0}")]
    Sql(#[from] sqlx::Error),

    /// Error while applying migrations
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Another run already holds this version, or the version skips ahead
    #[error("version {version} of battery {battery_id} on {day} is not the next version")]
    VersionConflict {
        /// The battery
        battery_id: BatteryId,
        /// The production day
        day: Date,
        /// The version that could not be saved
        version: Version,
    },

    /// A stored row does not describe a valid domain value
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl Error {
    /// Whether this error is a lost race for a run version.
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}
