//! Command-line interface definition and parsing.

use battalloc_core::models::{RunId, parse_day};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use time::Date;

/// Allocate commingled battery production across wells and reconcile it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short, long, env = "APP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// The operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

/// The operations the CLI exposes.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Load batteries, measurements and well tests from a JSON document.
    Import {
        /// The JSON document to load.
        file: PathBuf,
    },

    /// Allocate a battery's measured production for a day; prints the run id.
    Run {
        /// The battery to allocate.
        #[arg(long)]
        battery: String,
        /// The production day, as YYYY-MM-DD.
        #[arg(long, value_parser = parse_day)]
        day: Date,
        /// The allocation method (defaults to the configured method).
        #[arg(long)]
        method: Option<String>,
    },

    /// Reconcile the latest run of a battery/day against its measurement.
    Reconcile {
        /// The battery to reconcile.
        #[arg(long)]
        battery: String,
        /// The production day, as YYYY-MM-DD.
        #[arg(long, value_parser = parse_day)]
        day: Date,
        /// The largest acceptable absolute percent variance (defaults to the configured threshold).
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Print a persisted run.
    Show {
        /// The run id.
        #[arg(long)]
        run: RunId,
    },

    /// Print the version history of a battery/day.
    History {
        /// The battery.
        #[arg(long)]
        battery: String,
        /// The production day, as YYYY-MM-DD.
        #[arg(long, value_parser = parse_day)]
        day: Date,
    },
}

impl Cli {
    /// Parse command-line arguments.
    pub fn import() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}
