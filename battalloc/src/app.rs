//! The [`Application`] the CLI runs operations against.

use battalloc_core::models::RunId;
use battalloc_engine::Application;
use battalloc_sqlite::Db;
use battalloc_strategy::StrategyRegistry;
use time::OffsetDateTime;

/// A database handle paired with the configured strategies.
#[derive(Clone)]
pub struct CliApp {
    /// Database connection for persistent storage
    pub db: Db,
    /// The strategies runs are resolved against
    pub strategies: StrategyRegistry,
}

impl Application for CliApp {
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
