use crate::ProportionalByTest;
use battalloc_core::{models::FxBuildHasher, ports::AllocationStrategy};
use indexmap::IndexMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{Level, event};

/// What [`StrategyRegistry::resolve`] does with a method name it does not know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum UnknownMethodPolicy {
    /// Use the default strategy, logging a warning.
    #[default]
    Fallback,
    /// Refuse the request.
    Reject,
}

/// The error returned when a method is unknown and the policy is [`UnknownMethodPolicy::Reject`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown allocation method `{0}`")]
pub struct UnknownMethod(pub String);

/// A lookup from method name to a shared strategy instance.
///
/// Strategies are stateless, so a registry is built once at startup and
/// every run resolves its strategy against it. The default strategy is
/// always registered and is what unknown names fall back to under the
/// [`UnknownMethodPolicy::Fallback`] policy.
#[derive(Clone)]
pub struct StrategyRegistry {
    strategies: IndexMap<String, Arc<dyn AllocationStrategy>, FxBuildHasher>,
    default: Arc<dyn AllocationStrategy>,
    policy: UnknownMethodPolicy,
}

impl StrategyRegistry {
    /// Create a registry whose default (and only) strategy is `default`.
    pub fn new(default: impl AllocationStrategy + 'static) -> Self {
        let default: Arc<dyn AllocationStrategy> = Arc::new(default);
        let mut strategies = IndexMap::default();
        strategies.insert(default.name().to_owned(), default.clone());
        Self {
            strategies,
            default,
            policy: UnknownMethodPolicy::default(),
        }
    }

    /// Replace the unknown-method policy.
    pub fn with_policy(mut self, policy: UnknownMethodPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Register a strategy under its own name, replacing any strategy of the same name.
    pub fn register(&mut self, strategy: impl AllocationStrategy + 'static) -> &mut Self {
        let strategy: Arc<dyn AllocationStrategy> = Arc::new(strategy);
        let name = strategy.name().to_owned();
        if self.default.name() == name {
            self.default = strategy.clone();
        }
        self.strategies.insert(name, strategy);
        self
    }

    /// Make an already-registered strategy the default.
    ///
    /// Returns `false`, leaving the registry unchanged, if `method` is not registered.
    pub fn set_default(&mut self, method: &str) -> bool {
        match self.strategies.get(method) {
            Some(strategy) => {
                self.default = strategy.clone();
                true
            }
            None => false,
        }
    }

    /// The unknown-method policy in force
    pub fn policy(&self) -> UnknownMethodPolicy {
        self.policy
    }

    /// The name of the default strategy
    pub fn default_method(&self) -> &str {
        self.default.name()
    }

    /// The registered method names, in registration order
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(String::as_str)
    }

    /// Look up a strategy by exact name.
    pub fn get(&self, method: &str) -> Option<&Arc<dyn AllocationStrategy>> {
        self.strategies.get(method)
    }

    /// Select the strategy for `method`, applying the unknown-method policy.
    pub fn resolve(&self, method: &str) -> Result<Arc<dyn AllocationStrategy>, UnknownMethod> {
        if let Some(strategy) = self.get(method) {
            return Ok(strategy.clone());
        }
        match self.policy {
            UnknownMethodPolicy::Fallback => {
                event!(
                    Level::WARN,
                    requested = method,
                    fallback = self.default.name(),
                    "unknown allocation method, using default"
                );
                Ok(self.default.clone())
            }
            UnknownMethodPolicy::Reject => Err(UnknownMethod(method.to_owned())),
        }
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new(ProportionalByTest)
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("methods", &self.strategies.keys().collect::<Vec<_>>())
            .field("default", &self.default.name())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PROPORTIONAL_BY_TEST;
    use battalloc_core::models::{
        AllocationResult, Battery, BatteryMeasurement, Phases, Version, Volume, WellTest,
    };
    use rstest::*;
    use time::Date;

    /// Gives everything to the first well.
    struct FirstTakesAll;

    impl AllocationStrategy for FirstTakesAll {
        fn name(&self) -> &str {
            "first-takes-all"
        }

        fn allocate(
            &self,
            day: Date,
            battery: &Battery,
            measurement: &BatteryMeasurement,
            _tests: &[WellTest],
            version: Version,
        ) -> Vec<AllocationResult> {
            battery
                .wells()
                .iter()
                .enumerate()
                .map(|(index, well_id)| AllocationResult {
                    well_id: well_id.clone(),
                    day,
                    allocated: if index == 0 {
                        measurement.measured
                    } else {
                        Phases::splat(Volume::ZERO)
                    },
                    method: self.name().to_owned(),
                    version,
                })
                .collect()
        }
    }

    #[fixture]
    fn registry() -> StrategyRegistry {
        let mut registry = StrategyRegistry::default();
        registry.register(FirstTakesAll);
        registry
    }

    #[rstest]
    #[case::reference(PROPORTIONAL_BY_TEST, PROPORTIONAL_BY_TEST)]
    #[case::registered("first-takes-all", "first-takes-all")]
    #[case::unknown("largest-remainder", PROPORTIONAL_BY_TEST)]
    #[case::empty("", PROPORTIONAL_BY_TEST)]
    #[case::case_sensitive("Proportional-By-Test", PROPORTIONAL_BY_TEST)]
    fn should_resolve_with_fallback(
        registry: StrategyRegistry,
        #[case] method: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(registry.resolve(method).unwrap().name(), expected);
    }

    #[rstest]
    fn test_reject_policy(registry: StrategyRegistry) {
        let registry = registry.with_policy(UnknownMethodPolicy::Reject);
        assert!(registry.resolve("first-takes-all").is_ok());
        assert_eq!(
            registry.resolve("nope").err(),
            Some(UnknownMethod("nope".to_owned()))
        );
    }

    #[rstest]
    fn test_set_default(mut registry: StrategyRegistry) {
        assert!(!registry.set_default("nope"));
        assert_eq!(registry.default_method(), PROPORTIONAL_BY_TEST);

        assert!(registry.set_default("first-takes-all"));
        assert_eq!(registry.resolve("nope").unwrap().name(), "first-takes-all");
        assert_eq!(
            registry.methods().collect::<Vec<_>>(),
            [PROPORTIONAL_BY_TEST, "first-takes-all"]
        );
    }

    #[test]
    fn test_policy_serde() {
        let policy: UnknownMethodPolicy = serde_json::from_str(r#""reject""#).unwrap();
        assert_eq!(policy, UnknownMethodPolicy::Reject);
        assert_eq!(
            serde_json::to_string(&UnknownMethodPolicy::Fallback).unwrap(),
            r#""fallback""#
        );
    }
}
