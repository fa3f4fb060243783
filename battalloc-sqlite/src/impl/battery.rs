use crate::{
    Db, Error,
    types::{BatteryRow, MeasurementRow},
};
use battalloc_core::{
    models::{Battery, BatteryId, BatteryMeasurement},
    ports::{BatteryRepository, MeasurementRepository},
};
use time::Date;

impl BatteryRepository for Db {
    async fn get_battery(&self, battery_id: &BatteryId) -> Result<Option<Battery>, Self::Error> {
        sqlx::query_as::<_, BatteryRow>(
            r#"
            select
                id, site, asset, wells
            from
                battery
            where
                id = $1
            "#,
        )
        .bind(battery_id.as_str())
        .fetch_optional(&self.reader)
        .await?
        .map(Battery::try_from)
        .transpose()
    }
}

impl MeasurementRepository for Db {
    async fn get_measurement(
        &self,
        battery_id: &BatteryId,
        day: Date,
    ) -> Result<Option<BatteryMeasurement>, Error> {
        sqlx::query_as::<_, MeasurementRow>(
            r#"
            select
                battery_id, day, oil, gas, water
            from
                battery_measurement
            where
                battery_id = $1
            and
                day = $2
            "#,
        )
        .bind(battery_id.as_str())
        .bind(day)
        .fetch_optional(&self.reader)
        .await?
        .map(BatteryMeasurement::try_from)
        .transpose()
    }
}
