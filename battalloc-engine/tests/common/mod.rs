#![allow(dead_code)]

use battalloc_core::{
    models::{
        AllocationResult, AllocationRun, Battery, BatteryId, BatteryMeasurement, Phases, RunId,
        RunSummary, Version, Volume, WellId, WellTest,
    },
    ports::{
        BatteryRepository, MeasurementRepository, Repository, RunRepository, WellTestRepository,
    },
};
use battalloc_engine::Application;
use battalloc_strategy::StrategyRegistry;
use std::{collections::HashMap, sync::Mutex};
use time::{Date, OffsetDateTime, macros::datetime};

/// A repository that keeps everything in memory and enforces version uniqueness.
#[derive(Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    batteries: HashMap<BatteryId, Battery>,
    measurements: HashMap<(BatteryId, Date), BatteryMeasurement>,
    tests: Vec<WellTest>,
    runs: Vec<AllocationRun>,
}

#[derive(Debug, thiserror::Error)]
#[error("version {version} of {battery_id} on {day} is not the next version")]
pub struct VersionConflict {
    pub battery_id: BatteryId,
    pub day: Date,
    pub version: Version,
}

impl MemoryRepository {
    pub fn add_battery(&self, battery: Battery) {
        let mut state = self.state.lock().unwrap();
        state.batteries.insert(battery.id().clone(), battery);
    }

    pub fn add_measurement(&self, measurement: BatteryMeasurement) {
        let mut state = self.state.lock().unwrap();
        state.measurements.insert(
            (measurement.battery_id.clone(), measurement.day),
            measurement,
        );
    }

    pub fn add_test(&self, test: WellTest) {
        self.state.lock().unwrap().tests.push(test);
    }

    pub fn run_count(&self) -> usize {
        self.state.lock().unwrap().runs.len()
    }
}

impl Repository for MemoryRepository {
    type Error = VersionConflict;
}

impl BatteryRepository for MemoryRepository {
    async fn get_battery(&self, battery_id: &BatteryId) -> Result<Option<Battery>, Self::Error> {
        Ok(self.state.lock().unwrap().batteries.get(battery_id).cloned())
    }
}

impl MeasurementRepository for MemoryRepository {
    async fn get_measurement(
        &self,
        battery_id: &BatteryId,
        day: Date,
    ) -> Result<Option<BatteryMeasurement>, Self::Error> {
        let state = self.state.lock().unwrap();
        Ok(state.measurements.get(&(battery_id.clone(), day)).cloned())
    }
}

impl WellTestRepository for MemoryRepository {
    async fn get_well_tests(
        &self,
        well_ids: &[WellId],
        day: Date,
    ) -> Result<Vec<WellTest>, Self::Error> {
        let state = self.state.lock().unwrap();
        Ok(state
            .tests
            .iter()
            .filter(|test| test.day == day && well_ids.contains(&test.well_id))
            .cloned()
            .collect())
    }
}

impl State {
    fn latest(&self, battery_id: &BatteryId, day: Date) -> Option<Version> {
        self.runs
            .iter()
            .filter(|run| &run.battery_id == battery_id && run.day == day)
            .map(|run| run.version)
            .max()
    }
}

impl RunRepository for MemoryRepository {
    async fn next_version(
        &self,
        battery_id: &BatteryId,
        day: Date,
    ) -> Result<Version, Self::Error> {
        let state = self.state.lock().unwrap();
        Ok(state
            .latest(battery_id, day)
            .and_then(Version::next)
            .unwrap_or(Version::FIRST))
    }

    async fn save_run(&self, run: &AllocationRun) -> Result<(), Self::Error> {
        let mut state = self.state.lock().unwrap();
        let expected = state
            .latest(&run.battery_id, run.day)
            .and_then(Version::next)
            .unwrap_or(Version::FIRST);
        if run.version != expected {
            return Err(VersionConflict {
                battery_id: run.battery_id.clone(),
                day: run.day,
                version: run.version,
            });
        }
        state.runs.push(run.clone());
        Ok(())
    }

    async fn get_results(
        &self,
        battery_id: &BatteryId,
        day: Date,
        version: Version,
    ) -> Result<Vec<AllocationResult>, Self::Error> {
        let state = self.state.lock().unwrap();
        Ok(state
            .runs
            .iter()
            .find(|run| &run.battery_id == battery_id && run.day == day && run.version == version)
            .map(|run| run.results.clone())
            .unwrap_or_default())
    }

    async fn get_run(&self, run_id: RunId) -> Result<Option<AllocationRun>, Self::Error> {
        let state = self.state.lock().unwrap();
        Ok(state.runs.iter().find(|run| run.id == run_id).cloned())
    }

    async fn list_runs(
        &self,
        battery_id: &BatteryId,
        day: Date,
    ) -> Result<Vec<RunSummary>, Self::Error> {
        let state = self.state.lock().unwrap();
        let mut runs: Vec<RunSummary> = state
            .runs
            .iter()
            .filter(|run| &run.battery_id == battery_id && run.day == day)
            .map(AllocationRun::summary)
            .collect();
        runs.sort_by_key(|run| run.version);
        Ok(runs)
    }
}

pub struct TestApp {
    pub db: MemoryRepository,
    pub strategies: StrategyRegistry,
}

impl TestApp {
    pub fn new(strategies: StrategyRegistry) -> Self {
        Self {
            db: MemoryRepository::default(),
            strategies,
        }
    }
}

impl Application for TestApp {
    type Repository = MemoryRepository;

    fn database(&self) -> &Self::Repository {
        &self.db
    }

    fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    fn now(&self) -> OffsetDateTime {
        datetime!(2024-03-02 06:00 UTC)
    }

    fn generate_run_id(&self) -> RunId {
        uuid::Uuid::new_v4().into()
    }
}

pub const DAY: Date = time::macros::date!(2024 - 03 - 01);

pub fn battery_id() -> BatteryId {
    BatteryId::new("B1").unwrap()
}

pub fn well(id: &str) -> WellId {
    WellId::new(id).unwrap()
}

pub fn volumes(oil: f64, gas: f64, water: f64) -> Phases<Volume> {
    Phases::new(oil, gas, water).map(|x| Volume::from_f64(x).unwrap())
}

/// An app with battery B1 = [W1, W2], measured 100/50/20 on [`DAY`], tests 60/40 for oil.
pub fn seeded(strategies: StrategyRegistry) -> TestApp {
    let app = TestApp::new(strategies);
    app.db.add_battery(
        Battery::new(battery_id(), "North", "Field A", ["W1", "W2"].map(well)).unwrap(),
    );
    app.db.add_measurement(BatteryMeasurement::new(
        battery_id(),
        DAY,
        volumes(100.0, 50.0, 20.0),
    ));
    app.db
        .add_test(WellTest::new(well("W1"), DAY, Phases::new(60.0, 1.0, 3.0)));
    app.db
        .add_test(WellTest::new(well("W2"), DAY, Phases::new(40.0, 2.0, 1.0)));
    app
}
