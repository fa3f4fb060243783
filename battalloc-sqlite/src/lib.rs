#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

use sqlx::sqlite;
use std::str::FromStr;
use tokio::try_join;
use tracing::{Level, event};

pub mod config;
mod error;
mod r#impl;
mod load;
mod types;

use config::SqliteConfig;
pub use error::Error;
pub use load::{LoadSummary, ReferenceData};

/// SQLite storage for batteries, measurements, well tests and allocation runs.
///
/// The reader pool serves queries concurrently, while every write goes
/// through a single-connection writer pool so that writes are serialized.
///
/// ```no_run
/// # use battalloc_sqlite::{Db, config::SqliteConfig};
/// # async fn example() -> Result<(), battalloc_sqlite::Error> {
/// let db = Db::open(&SqliteConfig::default()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Db {
    /// Connection pool for read operations
    pub reader: sqlx::Pool<sqlx::Sqlite>,
    /// Connection pool for write operations (limited to 1 connection)
    pub writer: sqlx::Pool<sqlx::Sqlite>,
}

impl Db {
    /// Open the configured database, creating it if allowed, and apply pending migrations.
    ///
    /// Without a `database_path` the database lives in memory and is shared
    /// by both pools for as long as either holds a connection.
    pub async fn open(config: &SqliteConfig) -> Result<Self, Error> {
        let db_path = config
            .database_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        let options =
            sqlite::SqliteConnectOptions::from_str(db_path.as_deref().unwrap_or(":memory:"))?
                .busy_timeout(config.busy_timeout)
                .foreign_keys(true)
                .journal_mode(sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlite::SqliteSynchronous::Normal)
                .pragma("temp_store", "memory")
                .create_if_missing(config.create_if_missing);

        let reader = sqlite::SqlitePoolOptions::new().connect_with(options.clone());
        let writer = sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options);

        let (reader, writer) = try_join!(reader, writer)?;

        sqlx::migrate!("./schema").run(&writer).await?;

        event!(
            Level::DEBUG,
            path = db_path.as_deref().unwrap_or(":memory:"),
            "database ready"
        );
        Ok(Self { reader, writer })
    }
}
