//! Core library for the `weatherflow-etl` batch job.
//!
//! One run pulls current conditions for a list of cities from the weather
//! provider, flattens them into [`WeatherRecord`]s, inserts them into
//! PostgreSQL and writes a CSV backup:
//! - `extract`   – sequential provider requests plus the raw JSON backup
//! - `transform` – pure projection into a [`WeatherTable`]
//! - `load`      – database insert and CSV write
//! - `pipeline`  – the driver tying the three together
//!
//! Configuration lives in `config` and is passed explicitly to every stage.

pub mod config;
pub mod extract;
pub mod load;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod transform;

pub use config::Config;
pub use models::{RawObservation, WeatherRecord, WeatherTable};
pub use pipeline::{RunSummary, DEFAULT_CITIES};
