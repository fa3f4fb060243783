use crate::{Db, Error};
use battalloc_core::models::{Battery, BatteryMeasurement, WellTest};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, types::Json};
use tracing::{Level, event};

/// SQLite caps the number of bound parameters per statement.
const ROWS_PER_INSERT: usize = 1000;

/// A document of reference data to load into the database.
///
/// Every section is optional, so a document may carry only (say) the
/// measurements of one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Battery definitions
    #[serde(default)]
    pub batteries: Vec<Battery>,
    /// Custody measurements
    #[serde(default)]
    pub measurements: Vec<BatteryMeasurement>,
    /// Well tests
    #[serde(default)]
    pub well_tests: Vec<WellTest>,
}

/// How many records of each kind a [`Db::load`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Batteries inserted or replaced
    pub batteries: usize,
    /// Measurements inserted or replaced
    pub measurements: usize,
    /// Well tests inserted or replaced
    pub well_tests: usize,
}

impl Db {
    /// Insert or replace the reference data in `data`, all or nothing.
    ///
    /// Batteries are keyed by id, measurements by (battery, day) and well
    /// tests by (well, day); loading a record with an existing key replaces
    /// it. Measurements must refer to batteries that exist once the
    /// document's own batteries are loaded. Allocation runs are unaffected:
    /// correcting reference data and re-running allocates a new version.
    pub async fn load(&self, data: &ReferenceData) -> Result<LoadSummary, Error> {
        let mut tx = self.writer.begin().await?;

        for battery in &data.batteries {
            upsert_battery(&mut tx, battery).await?;
        }
        for chunk in data.measurements.chunks(ROWS_PER_INSERT) {
            upsert_measurements(&mut tx, chunk).await?;
        }
        for chunk in data.well_tests.chunks(ROWS_PER_INSERT) {
            upsert_well_tests(&mut tx, chunk).await?;
        }

        tx.commit().await?;

        let summary = LoadSummary {
            batteries: data.batteries.len(),
            measurements: data.measurements.len(),
            well_tests: data.well_tests.len(),
        };
        event!(
            Level::INFO,
            batteries = summary.batteries,
            measurements = summary.measurements,
            well_tests = summary.well_tests,
            "loaded reference data"
        );
        Ok(summary)
    }
}

async fn upsert_battery(conn: &mut SqliteConnection, battery: &Battery) -> Result<(), Error> {
    let wells = Json(battery.wells().iter().collect::<Vec<_>>());
    sqlx::query(
        r#"
        insert into
            battery (id, site, asset, wells)
        values
            ($1, $2, $3, $4)
        on conflict (id) do update set
            site = excluded.site,
            asset = excluded.asset,
            wells = excluded.wells
        "#,
    )
    .bind(battery.id().as_str())
    .bind(battery.site())
    .bind(battery.asset())
    .bind(wells)
    .execute(conn)
    .await?;
    Ok(())
}

async fn upsert_measurements(
    conn: &mut SqliteConnection,
    measurements: &[BatteryMeasurement],
) -> Result<(), Error> {
    if measurements.is_empty() {
        return Ok(());
    }
    let mut query_builder = sqlx::QueryBuilder::new(
        "insert into battery_measurement (battery_id, day, oil, gas, water) ",
    );
    query_builder.push_values(measurements, |mut b, measurement| {
        b.push_bind(measurement.battery_id.as_str())
            .push_bind(measurement.day)
            .push_bind(measurement.measured.oil.thousandths())
            .push_bind(measurement.measured.gas.thousandths())
            .push_bind(measurement.measured.water.thousandths());
    });
    query_builder.push(
        " on conflict (battery_id, day) do update set \
         oil = excluded.oil, gas = excluded.gas, water = excluded.water",
    );
    query_builder.build().execute(conn).await?;
    Ok(())
}

async fn upsert_well_tests(conn: &mut SqliteConnection, tests: &[WellTest]) -> Result<(), Error> {
    if tests.is_empty() {
        return Ok(());
    }
    let mut query_builder = sqlx::QueryBuilder::new(
        "insert into well_test (well_id, day, oil_rate, gas_rate, water_rate) ",
    );
    query_builder.push_values(tests, |mut b, test| {
        b.push_bind(test.well_id.as_str())
            .push_bind(test.day)
            .push_bind(test.rates.oil)
            .push_bind(test.rates.gas)
            .push_bind(test.rates.water);
    });
    query_builder.push(
        " on conflict (well_id, day) do update set \
         oil_rate = excluded.oil_rate, \
         gas_rate = excluded.gas_rate, \
         water_rate = excluded.water_rate",
    );
    query_builder.build().execute(conn).await?;
    Ok(())
}
