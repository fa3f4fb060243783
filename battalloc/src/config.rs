//! Application configuration management.
//!
//! Configuration is merged from default values, an optional configuration
//! file and environment variables, in increasing order of precedence.

use crate::Cli;
use battalloc_strategy::{PROPORTIONAL_BY_TEST, StrategyRegistry, UnknownMethodPolicy};
use serde::{Deserialize, Serialize};

/// The main application configuration that composes all component configs
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Database configuration (path, creation, lock timeout)
    #[serde(default)]
    pub database: battalloc_sqlite::config::SqliteConfig,

    /// Allocation defaults
    #[serde(default)]
    pub allocation: AllocationConfig,
}

/// Defaults applied when a command leaves a choice open.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AllocationConfig {
    /// The method used when `run` is given no `--method`, and the fallback
    /// for unknown methods
    #[serde(default = "default_method")]
    pub default_method: String,

    /// What to do with a method name no strategy is registered under
    #[serde(default)]
    pub unknown_method: UnknownMethodPolicy,

    /// The threshold used when `reconcile` is given no `--threshold`
    #[serde(default = "default_threshold")]
    pub variance_threshold_pct: f64,
}

fn default_method() -> String {
    PROPORTIONAL_BY_TEST.to_owned()
}

fn default_threshold() -> f64 {
    1.0
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            default_method: default_method(),
            unknown_method: UnknownMethodPolicy::default(),
            variance_threshold_pct: default_threshold(),
        }
    }
}

impl AllocationConfig {
    /// Build the strategy registry this configuration describes.
    pub fn registry(&self) -> anyhow::Result<StrategyRegistry> {
        let mut registry = StrategyRegistry::default().with_policy(self.unknown_method);
        if !registry.set_default(&self.default_method) {
            return Err(anyhow::anyhow!(
                "default method `{}` is not one of: {}",
                self.default_method,
                registry.methods().collect::<Vec<_>>().join(", ")
            ));
        }
        Ok(registry)
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given by the CLI
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern
    /// `APP_<SECTION>__<KEY>` to `<section>.<key>`:
    ///
    /// ```bash
    /// export APP_DATABASE__DATABASE_PATH="/var/lib/battalloc/allocation.db"
    /// export APP_ALLOCATION__UNKNOWN_METHOD="reject"
    /// ```
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = &cli.config {
            if path.exists() {
                config = config.add_source(config::File::from(path.as_path()))
            } else {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        // APP_ALLOCATION__DEFAULT_METHOD maps to allocation.default_method
        config = config.add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}
