//! Load a CSV dataset into the reporting database.
//!
//! Usage:
//!   cargo run --release --bin ingest -- [--db <PATH>] [--data-dir <DIR>]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use delivery_dashboard::config::{self, OutputFormat, Settings};
use delivery_dashboard::{db, ingest};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Load customers, drivers, products, orders, order items and deliveries from CSV")]
struct Args {
    /// SQLite database file, created if missing (falls back to DELIVERY_DB_PATH)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Directory holding the six CSV files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

fn main() -> Result<()> {
    config::init_tracing(config::TOOL_LOG_FILTER);

    let args = Args::parse();
    let settings = Settings::resolve(args.db, OutputFormat::Text);

    info!("Opening SQLite database at {}", settings.db_path.display());
    let mut conn = db::connect_writable(&settings.db_path)
        .with_context(|| format!("opening {}", settings.db_path.display()))?;

    info!("Loading dataset from {}", args.data_dir.display());
    let summary = ingest::load_dataset(&mut conn, &args.data_dir)
        .with_context(|| format!("loading {}", args.data_dir.display()))?;

    info!("=== Ingestion Complete ===");
    for (table, count) in summary.tables() {
        info!("{:12} {:>8} loaded {:>6} skipped", table, count.loaded, count.skipped);
    }
    info!(
        "Total: {} rows loaded, {} skipped",
        summary.total_loaded(),
        summary.total_skipped()
    );

    Ok(())
}
