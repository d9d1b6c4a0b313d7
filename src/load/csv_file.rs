//! CSV backup of the cleaned table.

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};

use crate::{config::CSV_FILE_NAME, models::WeatherRecord, models::WeatherTable};

// ---

/// Write the table as CSV to `<output_dir>/cleaned_weather.csv`.
///
/// The directory is created if missing and the file is replaced. The header
/// row is always written, even for an empty table; `None` becomes an empty
/// field. Returns the path written.
pub fn save_to_csv(table: &WeatherTable, output_dir: &Path) -> Result<PathBuf> {
    // ---
    fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    let path = output_dir.join(CSV_FILE_NAME);
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    wtr.write_record(WeatherRecord::COLUMNS)
        .context("Failed to write CSV header")?;
    for record in table {
        wtr.serialize(record)
            .with_context(|| format!("Failed to write CSV row to {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to flush CSV file: {}", path.display()))?;

    tracing::info!("Data saved to {} successfully", path.display());
    Ok(path)
}
