//! Runtime settings for the binaries.
//!
//! Environment variables:
//!   DELIVERY_DB_PATH - SQLite file to report on (default: food_delivery.db)
//!   RUST_LOG         - tracing filter (default depends on the binary)

use std::path::PathBuf;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

pub const DB_PATH_ENV: &str = "DELIVERY_DB_PATH";
pub const DEFAULT_DB_PATH: &str = "food_delivery.db";

/// Filter used by the reporting CLI so report text stays uncluttered.
pub const CLI_LOG_FILTER: &str = "warn";
/// Filter used by the data-loading binaries.
pub const TOOL_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub format: OutputFormat,
}

impl Settings {
    /// Explicit `--db` wins, then `DELIVERY_DB_PATH`, then the default file.
    pub fn resolve(db_arg: Option<PathBuf>, format: OutputFormat) -> Self {
        Self::resolve_with(db_arg, std::env::var(DB_PATH_ENV).ok(), format)
    }

    fn resolve_with(db_arg: Option<PathBuf>, env_db: Option<String>, format: OutputFormat) -> Self {
        let db_path = db_arg
            .or_else(|| env_db.filter(|p| !p.trim().is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));
        Self { db_path, format }
    }
}

/// `RUST_LOG` if set and valid, otherwise `default`.
pub fn log_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the stderr subscriber shared by all binaries.
pub fn init_tracing(default: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(default))
        .with_writer(std::io::stderr)
        .init();
}
