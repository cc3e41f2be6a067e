//! Configuration
//!
//! Command line arguments, each with an environment variable fallback. A `.env`
//! file in the working directory is read first when present.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use jiff::{Zoned, civil::Date};

/// Rosette configuration
#[derive(Debug, Parser)]
#[command(name = "rosette", about = "Promotion pricing for catalogs and carts", long_about = None)]
pub struct CliConfig {
    /// Fixture base directory
    #[arg(short, long, env = "ROSETTE_FIXTURES", default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Fixture set name
    #[arg(short, long, env = "ROSETTE_SET", default_value = "bakery")]
    pub set: String,

    /// Day to price on (YYYY-MM-DD); defaults to today
    #[arg(long, env = "ROSETTE_DATE")]
    pub at: Option<Date>,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Rosette commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List every product with its promotional price and badges
    Catalog,

    /// Price the fixture set's cart
    Cart,
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// The day promotions are evaluated on.
    pub fn day(&self) -> Date {
        self.at.unwrap_or_else(|| Zoned::now().date())
    }
}
