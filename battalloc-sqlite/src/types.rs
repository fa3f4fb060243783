//! Database row types and their conversion into domain values.
//!
//! Rows hold what SQLite hands back; converting them re-validates the
//! domain invariants, and a row that fails is reported as
//! [`Error::Corrupt`](crate::Error::Corrupt) rather than trusted.

use crate::Error;
use battalloc_core::models::{
    AllocationResult, Battery, BatteryId, BatteryMeasurement, Phases, RunId, RunSummary, Version,
    Volume, WellId, WellTest,
};
use sqlx::types::Json;
use time::{Date, OffsetDateTime};

fn corrupt(what: &str, err: impl std::fmt::Display) -> Error {
    Error::Corrupt(format!("{what}: {err}"))
}

pub(crate) fn battery_id(value: String) -> Result<BatteryId, Error> {
    BatteryId::new(value).map_err(|err| corrupt("battery id", err))
}

pub(crate) fn well_id(value: String) -> Result<WellId, Error> {
    WellId::new(value).map_err(|err| corrupt("well id", err))
}

pub(crate) fn run_id(value: &str) -> Result<RunId, Error> {
    value.parse().map_err(|err| corrupt("run id", err))
}

pub(crate) fn version(value: i64) -> Result<Version, Error> {
    u32::try_from(value)
        .ok()
        .and_then(Version::new)
        .ok_or_else(|| Error::Corrupt(format!("version: {value} is not a positive integer")))
}

fn volumes(oil: i64, gas: i64, water: i64) -> Phases<Volume> {
    Phases::new(oil, gas, water).map(Volume::from_thousandths)
}

#[derive(sqlx::FromRow)]
pub(crate) struct BatteryRow {
    pub id: String,
    pub site: String,
    pub asset: String,
    pub wells: Json<Vec<WellId>>,
}

impl TryFrom<BatteryRow> for Battery {
    type Error = Error;

    fn try_from(row: BatteryRow) -> Result<Self, Self::Error> {
        Battery::new(battery_id(row.id)?, row.site, row.asset, row.wells.0)
            .map_err(|err| corrupt("battery", err))
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct MeasurementRow {
    pub battery_id: String,
    pub day: Date,
    pub oil: i64,
    pub gas: i64,
    pub water: i64,
}

impl TryFrom<MeasurementRow> for BatteryMeasurement {
    type Error = Error;

    fn try_from(row: MeasurementRow) -> Result<Self, Self::Error> {
        Ok(BatteryMeasurement::new(
            battery_id(row.battery_id)?,
            row.day,
            volumes(row.oil, row.gas, row.water),
        ))
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct WellTestRow {
    pub well_id: String,
    pub day: Date,
    pub oil_rate: f64,
    pub gas_rate: f64,
    pub water_rate: f64,
}

impl TryFrom<WellTestRow> for WellTest {
    type Error = Error;

    fn try_from(row: WellTestRow) -> Result<Self, Self::Error> {
        Ok(WellTest::new(
            well_id(row.well_id)?,
            row.day,
            Phases::new(row.oil_rate, row.gas_rate, row.water_rate),
        ))
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct RunRow {
    pub id: String,
    pub battery_id: String,
    pub day: Date,
    pub method: String,
    pub version: i64,
    pub executed_at: OffsetDateTime,
}

impl TryFrom<RunRow> for RunSummary {
    type Error = Error;

    fn try_from(row: RunRow) -> Result<Self, Self::Error> {
        Ok(RunSummary {
            id: run_id(&row.id)?,
            version: version(row.version)?,
            method: row.method,
            executed_at: row.executed_at,
        })
    }
}

/// A result row, joined with the run it belongs to.
#[derive(sqlx::FromRow)]
pub(crate) struct ResultRow {
    pub well_id: String,
    pub day: Date,
    pub method: String,
    pub version: i64,
    pub oil: i64,
    pub gas: i64,
    pub water: i64,
}

impl TryFrom<ResultRow> for AllocationResult {
    type Error = Error;

    fn try_from(row: ResultRow) -> Result<Self, Self::Error> {
        Ok(AllocationResult {
            well_id: well_id(row.well_id)?,
            day: row.day,
            allocated: volumes(row.oil, row.gas, row.water),
            method: row.method,
            version: version(row.version)?,
        })
    }
}
