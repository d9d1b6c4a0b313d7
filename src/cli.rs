//! Command-line surface of the `weatherflow-etl` binary.

use clap::Parser;

use weatherflow_etl::{pipeline, Config};

/// Command-line arguments for one ETL run.
#[derive(Debug, Parser)]
#[command(name = "weatherflow-etl", version, about = "Weather ETL job")]
pub struct Cli {
    /// Cities to fetch; defaults to New York, London, Tokyo, Delhi, Sydney.
    pub cities: Vec<String>,

    /// Create the `weather_data` table if it is missing.
    #[arg(long)]
    pub create_schema: bool,
}

impl Cli {
    /// Fold flags into the environment-derived configuration.
    pub fn apply(&self, config: &mut Config) {
        if self.create_schema {
            config.create_schema = true;
        }
    }

    pub fn cities(&self) -> Vec<String> {
        if self.cities.is_empty() {
            pipeline::default_cities()
        } else {
            self.cities.clone()
        }
    }
}
