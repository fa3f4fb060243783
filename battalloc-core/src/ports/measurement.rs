use crate::models::{BatteryId, BatteryMeasurement};
use time::Date;

/// Repository interface for custody measurements.
pub trait MeasurementRepository: super::Repository {
    /// Retrieve the measurement for a battery on a day, or `None` if there is none.
    fn get_measurement(
        &self,
        battery_id: &BatteryId,
        day: Date,
    ) -> impl Future<Output = Result<Option<BatteryMeasurement>, Self::Error>> + Send;
}
