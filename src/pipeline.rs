//! Pipeline driver: extract, transform, then both loads, in that order.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    extract::{self, WeatherClient},
    load::{self, LoadError},
    transform, Config,
};

// ---

/// Cities fetched when none are given on the command line.
pub const DEFAULT_CITIES: [&str; 5] = ["New York", "London", "Tokyo", "Delhi", "Sydney"];

/// What one run did.
#[derive(Debug)]
pub struct RunSummary {
    // ---
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub cities_requested: usize,
    pub observations_fetched: usize,
    pub records_transformed: usize,
    /// Rows committed, or why nothing was.
    pub database: Result<usize, LoadError>,
    pub csv_path: PathBuf,
}

pub fn default_cities() -> Vec<String> {
    DEFAULT_CITIES.iter().map(|c| c.to_string()).collect()
}

/// Run the whole ETL pass once.
///
/// A database failure is logged and recorded in the summary but does not
/// fail the run. Fetch-stage backup writes and the CSV write do propagate.
pub async fn run(config: &Config, cities: &[String]) -> Result<RunSummary> {
    // ---
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("etl_run", %run_id);
    run_inner(config, cities, run_id).instrument(span).await
}

async fn run_inner(config: &Config, cities: &[String], run_id: Uuid) -> Result<RunSummary> {
    // ---
    let started_at = Utc::now();
    tracing::info!("ETL pipeline started.");

    // Extract
    let client = WeatherClient::new(config);
    let raw_data = extract::fetch_weather_data(&client, cities, &config.raw_backup_path).await?;

    // Transform
    let cleaned_data = transform::clean_weather_data(&raw_data);

    // Load
    let database = load::load_to_database(config, &cleaned_data).await;
    if let Err(e) = &database {
        tracing::error!("Error loading data into database: {}", e);
    }
    let csv_path = load::save_to_csv(&cleaned_data, &config.output_dir)?;

    tracing::info!("ETL pipeline completed successfully.");

    Ok(RunSummary {
        run_id,
        started_at,
        cities_requested: cities.len(),
        observations_fetched: raw_data.len(),
        records_transformed: cleaned_data.len(),
        database,
        csv_path,
    })
}
