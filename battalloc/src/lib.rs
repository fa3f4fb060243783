#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod app;
pub use app::CliApp;

mod cli;
pub use cli::{Cli, Commands};

mod commands;
pub use commands::{Outcome, execute};

mod config;
pub use config::{AllocationConfig, AppConfig};
