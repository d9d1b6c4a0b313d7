//! Application entry point for the `weatherflow-etl` batch job.
//!
//! This binary runs one ETL pass and exits:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Parsing the city list and flags from the command line
//! - Running extract, transform and both loads via `pipeline::run`
//!
//! # Environment Variables
//! - `OPENWEATHER_API_KEY` – provider key sent as `appid`
//! - `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD` – PostgreSQL
//! - `RAW_BACKUP_PATH`, `OUTPUT_DIR` – backup locations
//! - `ETL_LOG_LEVEL` (optional) – log verbosity (default: `info`)
//! - `ETL_SPAN_EVENTS` (optional) – span event mode for tracing
//!
//! A database failure is logged and does not change the exit status; see
//! `RunSummary::database` for the library-level outcome.
use std::{env, io::IsTerminal};

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use anyhow::Result;

mod cli;

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    init_tracing();
    dotenv().ok();

    let args = cli::Cli::parse();

    let mut cfg = weatherflow_etl::config::load_from_env()?;
    args.apply(&mut cfg);
    cfg.log_config();

    let summary = weatherflow_etl::pipeline::run(&cfg, &args.cities()).await?;

    tracing::debug!(
        "Run {} (started {}) finished: {}/{} cities fetched, {} records, database: {}",
        summary.run_id,
        summary.started_at.to_rfc3339(),
        summary.observations_fetched,
        summary.cities_requested,
        summary.records_transformed,
        match &summary.database {
            Ok(rows) => format!("{rows} rows"),
            Err(_) => "failed".to_string(),
        }
    );

    Ok(())
}

// ---

/// Initialize the global tracing subscriber for structured logging.
///
/// This function configures the [`tracing_subscriber`] with:
/// - Log target, file, and line number output enabled
/// - Color output controlled by TTY detection and `FORCE_COLOR` env var:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY
/// - Span event emission mode controlled by the `ETL_SPAN_EVENTS` env var:
///   - `"full"`       : emit ENTER, EXIT, and CLOSE events with timing
///   - `"enter_exit"` : emit ENTER and EXIT only
///   - unset or other values: emit CLOSE events only (default)
/// - Log level controlled by the `ETL_LOG_LEVEL` env var
///
/// This should be called once at startup before any logging or tracing
/// macros are invoked.
fn init_tracing() {
    // ---
    let span_events = match env::var("ETL_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    // Determine if we should use colors
    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    // Use RUST_LOG if available, otherwise fall back to ETL_LOG_LEVEL
    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("ETL_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "info",
        };
        EnvFilter::new(format!("{level},sqlx::query=warn"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
