use crate::models::{BatteryId, Phases, Volume};
use time::Date;

/// The custody-grade volumes metered at a battery for one day.
///
/// This is the total an allocation distributes, and it is taken as ground
/// truth: any temperature or pressure correction has already been applied
/// upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatteryMeasurement {
    /// The measured battery
    pub battery_id: BatteryId,
    /// The production day
    pub day: Date,
    /// The measured oil, gas and water volumes
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub measured: Phases<Volume>,
}

impl BatteryMeasurement {
    /// Record a measurement.
    pub fn new(battery_id: BatteryId, day: Date, measured: Phases<Volume>) -> Self {
        Self {
            battery_id,
            day,
            measured,
        }
    }
}
