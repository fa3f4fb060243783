use crate::models::{Battery, BatteryId};

/// Repository interface for battery reference data.
///
/// Batteries are owned outside the allocation engine; this port is read-only.
pub trait BatteryRepository: super::Repository {
    /// Retrieve a battery and its ordered well set.
    ///
    /// # Returns
    ///
    /// - Ok(Some(battery)) if the battery is known
    /// - Ok(None) if it is not
    /// - Err on a storage failure
    fn get_battery(
        &self,
        battery_id: &BatteryId,
    ) -> impl Future<Output = Result<Option<Battery>, Self::Error>> + Send;
}
