//! Transform stage: raw provider payloads into a [`WeatherTable`].
//!
//! Pure and deterministic. Missing fields become `None`; nothing here
//! performs I/O or returns an error.

use crate::models::{RawObservation, WeatherTable};

// ---

/// Project every raw observation into a record, preserving input order.
pub fn clean_weather_data(raw: &[RawObservation]) -> WeatherTable {
    // ---
    let table: WeatherTable = raw.iter().map(RawObservation::to_record).collect();
    tracing::debug!("Transformed {} observations", table.len());
    table
}
