use battalloc::{AppConfig, Cli, CliApp, execute};
use battalloc_sqlite::Db;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Events go to stderr so that command output on stdout stays parseable.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::import().unwrap_or_else(|err| err.exit());

    let AppConfig {
        database,
        allocation,
    } = AppConfig::load(&cli)?;

    let db = Db::open(&database).await?;
    let app = CliApp {
        db,
        strategies: allocation.registry()?,
    };

    let outcome = execute(&app, &allocation, cli.command, &mut std::io::stdout().lock()).await?;
    Ok(outcome.into())
}
