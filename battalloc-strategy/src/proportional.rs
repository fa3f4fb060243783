use crate::split::{rate_weights, split_proportionally};
use battalloc_core::{
    models::{
        AllocationResult, Battery, BatteryMeasurement, Phase, Phases, Version, Volume, WellId,
        WellTest,
    },
    ports::AllocationStrategy,
};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use time::Date;

/// The method name of [`ProportionalByTest`]
pub const PROPORTIONAL_BY_TEST: &str = "proportional-by-test";

/// Allocate each phase in proportion to the wells' test rates.
///
/// For every phase independently, a well's share is its (clamped) test
/// rate over the sum of its battery's (clamped) test rates. Shares are
/// applied to the measured volume and truncated to thousandths, and the
/// truncation shortfall is handed back one thousandth at a time in battery
/// order, so the allocated volumes of a phase sum to exactly the measured
/// volume.
///
/// Wells with no test, and phases whose rates are all zero, receive
/// nothing; in the latter case the measured volume for that phase is left
/// unallocated rather than spread evenly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalByTest;

impl AllocationStrategy for ProportionalByTest {
    fn name(&self) -> &str {
        PROPORTIONAL_BY_TEST
    }

    fn allocate(
        &self,
        day: Date,
        battery: &Battery,
        measurement: &BatteryMeasurement,
        tests: &[WellTest],
        version: Version,
    ) -> Vec<AllocationResult> {
        // Only tests for this battery's wells count; the first test for a well wins.
        let mut by_well: IndexMap<&WellId, &WellTest, FxBuildHasher> = IndexMap::default();
        for test in tests.iter().filter(|test| battery.contains(&test.well_id)) {
            by_well.entry(&test.well_id).or_insert(test);
        }

        let parts: Phases<Vec<i64>> = Phases::from_fn(|phase| {
            let rates: Vec<f64> = battery
                .wells()
                .iter()
                .map(|well_id| {
                    by_well
                        .get(well_id)
                        .map_or(0.0, |test| test.effective_rate(phase))
                })
                .collect();
            split_proportionally(
                measurement.measured.get(phase).thousandths(),
                &rate_weights(&rates),
            )
        });

        battery
            .wells()
            .iter()
            .enumerate()
            .map(|(index, well_id)| AllocationResult {
                well_id: well_id.clone(),
                day,
                allocated: Phases::from_fn(|phase: Phase| {
                    Volume::from_thousandths(parts.get(phase)[index])
                }),
                method: self.name().to_owned(),
                version,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battalloc_core::models::BatteryId;
    use rstest::*;
    use time::macros::date;

    const DAY: Date = date!(2024 - 05 - 01);

    fn battery(wells: &[&str]) -> Battery {
        Battery::new(
            BatteryId::new("B1").unwrap(),
            "site",
            "asset",
            wells.iter().map(|id| WellId::new(*id).unwrap()),
        )
        .unwrap()
    }

    fn measurement(oil: f64, gas: f64, water: f64) -> BatteryMeasurement {
        BatteryMeasurement::new(
            BatteryId::new("B1").unwrap(),
            DAY,
            Phases::new(oil, gas, water).map(|x| Volume::from_f64(x).unwrap()),
        )
    }

    fn test(well: &str, oil: f64, gas: f64, water: f64) -> WellTest {
        WellTest::new(WellId::new(well).unwrap(), DAY, Phases::new(oil, gas, water))
    }

    fn oil(results: &[AllocationResult]) -> Vec<f64> {
        results.iter().map(|r| r.allocated.oil.as_f64()).collect()
    }

    #[rstest]
    #[case::exact_split(60.0, 40.0, 100.0, [60.0, 40.0])]
    #[case::one_thousandth_fixup(1.0, 2.0, 1.0, [0.334, 0.666])]
    #[case::equal_rates(5.0, 5.0, 0.001, [0.001, 0.0])]
    #[case::tiny_rates(1e-7, 3e-7, 100.0, [25.0, 75.0])]
    #[case::huge_rates(2e12, 1e12, 300.0, [200.0, 100.0])]
    #[case::unrounded_rates(1.4e-6, 2.6e-6, 4.0, [1.4, 2.6])]
    #[case::thirds(3.0, 1.0, 20.0, [15.0, 5.0])]
    fn should_split_oil(
        #[case] rate1: f64,
        #[case] rate2: f64,
        #[case] measured: f64,
        #[case] expected: [f64; 2],
    ) {
        let results = ProportionalByTest.allocate(
            DAY,
            &battery(&["W1", "W2"]),
            &measurement(measured, 0.0, 0.0),
            &[test("W1", rate1, 0.0, 0.0), test("W2", rate2, 0.0, 0.0)],
            Version::FIRST,
        );
        assert_eq!(oil(&results), expected);
        let total: Volume = results.iter().map(|r| r.allocated.oil).sum();
        assert_eq!(total, Volume::from_f64(measured).unwrap());
    }

    #[test]
    fn test_results_follow_battery_order_and_are_stamped() {
        let version = Version::new(4).unwrap();
        let results = ProportionalByTest.allocate(
            DAY,
            &battery(&["W3", "W1", "W2"]),
            &measurement(30.0, 3.0, 0.3),
            // deliberately out of order, with a stranger
            &[
                test("W2", 1.0, 1.0, 1.0),
                test("X9", 100.0, 100.0, 100.0),
                test("W1", 1.0, 1.0, 1.0),
                test("W3", 1.0, 1.0, 1.0),
            ],
            version,
        );

        let wells: Vec<&str> = results.iter().map(|r| r.well_id.as_str()).collect();
        assert_eq!(wells, ["W3", "W1", "W2"]);
        assert!(results.iter().all(|r| r.version == version));
        assert!(results.iter().all(|r| r.method == PROPORTIONAL_BY_TEST));
        assert!(results.iter().all(|r| r.day == DAY));
        assert_eq!(oil(&results), [10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_missing_and_negative_rates_are_zero() {
        let results = ProportionalByTest.allocate(
            DAY,
            &battery(&["W1", "W2", "W3"]),
            &measurement(90.0, 10.0, 5.0),
            &[test("W1", 30.0, -2.0, 1.0), test("W2", -10.0, 8.0, 1.0)],
            Version::FIRST,
        );

        // W3 has no test; W2's oil and W1's gas are negative
        assert_eq!(oil(&results), [90.0, 0.0, 0.0]);
        assert_eq!(results[1].allocated.gas.as_f64(), 10.0);
        assert_eq!(results[0].allocated.gas, Volume::ZERO);
        assert_eq!(results[2].allocated, Phases::splat(Volume::ZERO));
        assert_eq!(results[0].allocated.water.as_f64(), 2.5);
        assert_eq!(results[1].allocated.water.as_f64(), 2.5);
    }

    #[test]
    fn test_zero_rates_allocate_nothing() {
        let results = ProportionalByTest.allocate(
            DAY,
            &battery(&["W1", "W2"]),
            &measurement(100.0, 50.0, 25.0),
            &[test("W1", 10.0, 0.0, 0.0), test("W2", 10.0, -1.0, 0.0)],
            Version::FIRST,
        );
        assert!(results.iter().all(|r| r.allocated.gas == Volume::ZERO));
        assert!(results.iter().all(|r| r.allocated.water == Volume::ZERO));
        assert_eq!(oil(&results), [50.0, 50.0]);
    }

    #[test]
    fn test_duplicate_tests_first_wins() {
        let results = ProportionalByTest.allocate(
            DAY,
            &battery(&["W1", "W2"]),
            &measurement(10.0, 0.0, 0.0),
            &[
                test("W1", 1.0, 0.0, 0.0),
                test("W1", 9.0, 0.0, 0.0),
                test("W2", 1.0, 0.0, 0.0),
            ],
            Version::FIRST,
        );
        assert_eq!(oil(&results), [5.0, 5.0]);
    }

    #[test]
    fn test_is_deterministic() {
        let battery = battery(&["A", "B", "C", "D"]);
        let measured = measurement(1234.567, 89.012, 3.456);
        let tests = [
            test("A", 13.3, 0.7, 1.1),
            test("B", 7.9, 2.2, 0.0),
            test("C", 0.1, 0.0, 4.4),
            test("D", 22.0, 1.9, 0.3),
        ];
        let first = ProportionalByTest.allocate(DAY, &battery, &measured, &tests, Version::FIRST);
        let second = ProportionalByTest.allocate(DAY, &battery, &measured, &tests, Version::FIRST);
        assert_eq!(first, second);
    }
}
