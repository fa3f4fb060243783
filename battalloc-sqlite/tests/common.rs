#![allow(dead_code)]

use battalloc_core::models::{
    Battery, BatteryId, BatteryMeasurement, Phases, RunId, Volume, WellId, WellTest,
};
use battalloc_engine::Application;
use battalloc_sqlite::{Db, ReferenceData, config::SqliteConfig};
use battalloc_strategy::StrategyRegistry;
use time::{Date, OffsetDateTime, macros::date};

pub struct TestApp {
    pub db: Db,
    pub strategies: StrategyRegistry,
}

impl TestApp {
    pub async fn open() -> anyhow::Result<Self> {
        Ok(Self {
            db: Db::open(&SqliteConfig::default()).await?,
            strategies: StrategyRegistry::default(),
        })
    }
}

impl Application for TestApp {
    type Repository = Db;

    fn database(&self) -> &Self::Repository {
        &self.db
    }

    fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn generate_run_id(&self) -> RunId {
        uuid::Uuid::new_v4().into()
    }
}

pub const DAY: Date = date!(2024 - 06 - 30);

pub fn battery_id(id: &str) -> BatteryId {
    BatteryId::new(id).unwrap()
}

pub fn well(id: &str) -> WellId {
    WellId::new(id).unwrap()
}

pub fn volumes(oil: f64, gas: f64, water: f64) -> Phases<Volume> {
    Phases::new(oil, gas, water).map(|x| Volume::from_f64(x).unwrap())
}

/// Battery B1 = [W2, W1, W3] on [`DAY`], with tests for W1 and W2 only.
pub fn reference_data() -> ReferenceData {
    ReferenceData {
        batteries: vec![
            Battery::new(battery_id("B1"), "North", "Field A", ["W2", "W1", "W3"].map(well))
                .unwrap(),
        ],
        measurements: vec![BatteryMeasurement::new(
            battery_id("B1"),
            DAY,
            volumes(1.0, 250.5, 12.0),
        )],
        well_tests: vec![
            WellTest::new(well("W1"), DAY, Phases::new(2.0, 10.0, 3.0)),
            WellTest::new(well("W2"), DAY, Phases::new(1.0, 5.0, -3.0)),
            // a test for a well outside B1
            WellTest::new(well("X1"), DAY, Phases::new(100.0, 100.0, 100.0)),
        ],
    }
}
