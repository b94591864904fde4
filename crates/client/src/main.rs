//! Top Dog headless client binary.
//!
//! Runs one match from environment configuration and prints a JSON summary
//! to stdout. Logs go to stderr (and a file when `TOPDOG_LOG_DIR` is set).
//!
//! # Examples
//!
//! ```bash
//! TOPDOG_SEED=7 TOPDOG_STAGE=yard cargo run -p topdog-client
//! RUST_LOG=runtime=debug TOPDOG_REALTIME=1 cargo run -p topdog-client
//! ```

use anyhow::Result;
use topdog_client::{ClientConfig, Session, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _guard = logging::setup_logging(config.log_dir.as_deref())?;

    tracing::info!("Starting Top Dog client");
    let realtime = config.realtime;
    let mut session = Session::new(config)?;

    let summary = if realtime {
        session.run_realtime().await
    } else {
        session.run()
    };

    match &summary.winner {
        Some(name) => tracing::info!(winner = %name, ticks = summary.ticks, "match over"),
        None => tracing::info!(ticks = summary.ticks, "tick budget exhausted"),
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
