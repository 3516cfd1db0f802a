//! Vanguard game client binary.
//!
//! Reads one JSON request per line from stdin and writes one JSON reply per
//! line to stdout. Logs go to stderr and, optionally, to a log file.
//!
//! # Examples
//!
//! ```bash
//! # In-memory games, events echoed on stdout
//! echo '{"op":"createGame"}' | cargo run -p vanguard-client -- --watch
//!
//! # Games persisted under ./games
//! cargo run -p vanguard-client -- --data-dir ./games --log-dir ./logs
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::io::BufReader;

use vanguard_client::Client;
use vanguard_client::config::{ClientConfig, Overrides, StorageKind};
use vanguard_client::logging;
use vanguard_runtime::Runtime;

/// Vanguard rules engine over line-delimited JSON
#[derive(Parser)]
#[command(name = "vanguard")]
#[command(about = "Vanguard rules engine over line-delimited JSON", long_about = None)]
#[command(version)]
struct Cli {
    /// Storage backend (overrides VANGUARD_STORAGE)
    #[arg(long, value_enum)]
    storage: Option<StorageKind>,

    /// Directory for persisted games; implies file storage
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Also write logs to DIR/vanguard.log
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Print committed events on stdout between replies
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().with_overrides(Overrides {
        storage: cli.storage,
        data_dir: cli.data_dir,
        log_dir: cli.log_dir,
        watch_events: cli.watch,
    });

    let _log_guard = logging::setup_logging(config.log_dir.as_deref())?;

    tracing::info!("Starting Vanguard client");
    tracing::info!("Storage: {:?}", config.runtime.storage);

    let runtime = Runtime::builder()
        .config(config.runtime.clone())
        .build()
        .await?;

    let client = Client::builder()
        .runtime(runtime)
        .watch_events(config.watch_events)
        .build()?;

    client
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    tracing::info!("Client shutdown complete");
    Ok(())
}
