use crate::models::{BatteryId, Phases, Version, Volume};
use time::Date;

/// The comparison of a persisted run's allocated totals against the
/// battery measurement it distributed.
///
/// Summaries are computed on demand and never stored.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReconciliationSummary {
    /// The reconciled battery
    pub battery_id: BatteryId,
    /// The production day
    pub day: Date,
    /// The run version that was reconciled (the latest for the key)
    pub version: Version,
    /// The measured totals
    pub measured: Phases<Volume>,
    /// The allocated totals
    pub allocated: Phases<Volume>,
    /// Percent variance of allocated against measured, per phase
    pub variance_pct: Phases<f64>,
    /// Whether every phase's absolute variance is within the requested threshold
    pub within_threshold: bool,
}

impl ReconciliationSummary {
    /// Compare allocated totals against measured totals.
    pub fn evaluate(
        battery_id: BatteryId,
        day: Date,
        version: Version,
        measured: Phases<Volume>,
        allocated: Phases<Volume>,
        variance_pct_threshold: f64,
    ) -> Self {
        let variance_pct = measured
            .zip(allocated)
            .map(|(measured, allocated)| variance_pct(measured, allocated));
        let within_threshold = variance_pct
            .iter()
            .all(|(_, variance)| variance.abs() <= variance_pct_threshold);
        Self {
            battery_id,
            day,
            version,
            measured,
            allocated,
            variance_pct,
            within_threshold,
        }
    }
}

/// The percent variance of `allocated` against `measured`, rounded to three decimals.
///
/// A zero measurement has no meaningful ratio: matching zeros are a 0%
/// variance and anything allocated against zero is reported as 100%.
pub fn variance_pct(measured: Volume, allocated: Volume) -> f64 {
    match (measured.is_zero(), allocated.is_zero()) {
        (true, true) => 0.0,
        (true, false) => 100.0,
        _ => {
            let difference = (allocated - measured).thousandths() as f64;
            let ratio = difference / measured.thousandths() as f64 * 100.0;
            (ratio * 1000.0).round() / 1000.0
        }
    }
}
