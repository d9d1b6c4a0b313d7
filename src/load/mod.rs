//! Load stage: the same [`WeatherTable`](crate::WeatherTable) goes to
//! PostgreSQL and to a CSV backup.
//!
//! The two sinks are independent; the driver runs the database insert first
//! and the CSV write second regardless of how the insert went.

mod csv_file;
mod database;

pub use csv_file::save_to_csv;
pub use database::{connect_options, load_to_database, LoadError, TABLE_NAME};
