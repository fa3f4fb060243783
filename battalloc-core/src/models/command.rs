use crate::models::{BatteryId, EmptyIdError};
use thiserror::Error;
use time::{Date, macros::format_description};

/// A request to allocate a battery's production for one day.
///
/// Commands are built from loosely-typed input (the CLI, a message, a
/// form), so construction checks every required field before anything
/// executes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunAllocation {
    /// The production day
    pub day: Date,
    /// The battery to allocate
    pub battery_id: BatteryId,
    /// The requested strategy name (not checked against known strategies here)
    pub method: String,
}

/// A request to reconcile the latest run of a battery/day against its measurement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reconcile {
    /// The production day
    pub day: Date,
    /// The battery to reconcile
    pub battery_id: BatteryId,
    /// The largest acceptable absolute percent variance, per phase
    pub variance_pct_threshold: f64,
}

/// The ways in which a command may be missing required fields.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The battery id was empty
    #[error(transparent)]
    BatteryId(#[from] EmptyIdError),
    /// The day was not a `YYYY-MM-DD` calendar date
    #[error("invalid day {0:?}, expected YYYY-MM-DD")]
    Day(String),
    /// The method was empty
    #[error("method must not be empty")]
    Method,
    /// The threshold was negative or not a number
    #[error("variance threshold must be a non-negative number, got {0}")]
    Threshold(f64),
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_day(day: &str) -> Result<Date, ValidationError> {
    Date::parse(day.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| ValidationError::Day(day.to_owned()))
}

impl RunAllocation {
    /// Validate the fields of an allocation request.
    pub fn new(
        day: Date,
        battery_id: impl Into<String>,
        method: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let battery_id = BatteryId::new(battery_id)?;
        let method = method.into();
        if method.trim().is_empty() {
            return Err(ValidationError::Method);
        }
        Ok(Self {
            day,
            battery_id,
            method,
        })
    }

    /// Validate an allocation request whose day is still text.
    pub fn parse(
        day: &str,
        battery_id: impl Into<String>,
        method: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::new(parse_day(day)?, battery_id, method)
    }

    /// Re-check the invariants of an already-built command (e.g. after deserialization).
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.method.trim().is_empty() {
            Err(ValidationError::Method)
        } else {
            Ok(())
        }
    }
}

impl Reconcile {
    /// Validate the fields of a reconciliation request.
    pub fn new(
        day: Date,
        battery_id: impl Into<String>,
        variance_pct_threshold: f64,
    ) -> Result<Self, ValidationError> {
        let command = Self {
            day,
            battery_id: BatteryId::new(battery_id)?,
            variance_pct_threshold,
        };
        command.validate()?;
        Ok(command)
    }

    /// Validate a reconciliation request whose day is still text.
    pub fn parse(
        day: &str,
        battery_id: impl Into<String>,
        variance_pct_threshold: f64,
    ) -> Result<Self, ValidationError> {
        Self::new(parse_day(day)?, battery_id, variance_pct_threshold)
    }

    /// Re-check the invariants of an already-built command.
    pub fn validate(&self) -> Result<(), ValidationError> {
        // NaN fails the comparison as well
        if self.variance_pct_threshold >= 0.0 {
            Ok(())
        } else {
            Err(ValidationError::Threshold(self.variance_pct_threshold))
        }
    }
}
