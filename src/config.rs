//! Configuration loader for the `weatherflow-etl` batch job.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase, and tests can
//! build a [`Config`] from a fixture lookup without touching the process
//! environment.
//!
//! None of the provider or database values are required up front: a missing
//! API key surfaces as rejected requests, missing database parameters surface
//! as a connection or authentication failure when the loader runs.
use std::{env, path::PathBuf};

use anyhow::{anyhow, Result};

/// Default OpenWeather current-conditions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Default location of the raw JSON backup.
pub const DEFAULT_RAW_BACKUP_PATH: &str = "data/raw_weather.json";

/// Default directory for the cleaned CSV output.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// File name of the cleaned CSV inside the output directory.
pub const CSV_FILE_NAME: &str = "cleaned_weather.csv";

/// Parse an optional `u16` variable; present-but-invalid is an error.
macro_rules! parse_opt_u16 {
    ($lookup:expr, $var_name:expr) => {
        $lookup($var_name)
            .map(|v| v.trim().parse::<u16>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
    };
}

/// Parse an optional boolean variable with a default value.
macro_rules! parse_bool {
    ($lookup:expr, $var_name:expr, $default:expr) => {
        match $lookup($var_name).as_deref().map(str::trim) {
            None => $default,
            Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") => false,
            Some(other) => return Err(anyhow!("Invalid {}: {:?}", $var_name, other)),
        }
    };
}

/// PostgreSQL connection parameters, each supplied externally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbConfig {
    // ---
    pub host: Option<String>,
    pub port: Option<u16>,
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of one run.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// OpenWeather API key sent as `appid`.
    pub api_key: Option<String>,

    /// Weather provider endpoint.
    pub api_url: String,

    /// Database connection parameters.
    pub db: DbConfig,

    /// Where the raw provider responses are written. The parent directory
    /// must already exist.
    pub raw_backup_path: PathBuf,

    /// Directory holding the cleaned CSV; created on demand.
    pub output_dir: PathBuf,

    /// Run `CREATE TABLE IF NOT EXISTS` before inserting.
    pub create_schema: bool,
}

/// Load configuration from environment variables with defaults.
///
/// Recognised:
/// - `OPENWEATHER_API_KEY`, `OPENWEATHER_BASE_URL`
/// - `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`
/// - `RAW_BACKUP_PATH` (default: `data/raw_weather.json`)
/// - `OUTPUT_DIR` (default: `output`)
/// - `ETL_CREATE_SCHEMA` (default: false)
///
/// Returns an error only if a present variable cannot be parsed.
pub fn load_from_env() -> Result<Config> {
    // ---
    load_from(|key| env::var(key).ok())
}

/// Build configuration from an arbitrary key lookup.
pub fn load_from<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let db = DbConfig {
        host: non_empty("DB_HOST"),
        port: parse_opt_u16!(non_empty, "DB_PORT"),
        name: non_empty("DB_NAME"),
        user: non_empty("DB_USER"),
        password: non_empty("DB_PASSWORD"),
    };

    Ok(Config {
        api_key: non_empty("OPENWEATHER_API_KEY"),
        api_url: non_empty("OPENWEATHER_BASE_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        db,
        raw_backup_path: non_empty("RAW_BACKUP_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RAW_BACKUP_PATH)),
        output_dir: non_empty("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        create_schema: parse_bool!(non_empty, "ETL_CREATE_SCHEMA", false),
    })
}

impl Config {
    /// Full path of the cleaned CSV file.
    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(CSV_FILE_NAME)
    }

    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks the database password and the API key while showing all other
    /// configuration values that were loaded.
    pub fn log_config(&self) {
        // ---
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "<unset>".to_string());

        tracing::info!("Configuration loaded:");
        tracing::info!("  OPENWEATHER_API_KEY  : {}", mask(&self.api_key));
        tracing::info!("  OPENWEATHER_BASE_URL : {}", self.api_url);
        tracing::info!("  DB_HOST              : {}", show(&self.db.host));
        tracing::info!(
            "  DB_PORT              : {}",
            self.db.port.map_or_else(|| "<unset>".to_string(), |p| p.to_string())
        );
        tracing::info!("  DB_NAME              : {}", show(&self.db.name));
        tracing::info!("  DB_USER              : {}", show(&self.db.user));
        tracing::info!("  DB_PASSWORD          : {}", mask(&self.db.password));
        tracing::info!("  RAW_BACKUP_PATH      : {}", self.raw_backup_path.display());
        tracing::info!("  OUTPUT_DIR           : {}", self.output_dir.display());
        tracing::info!("  ETL_CREATE_SCHEMA    : {}", self.create_schema);
    }
}

fn mask(secret: &Option<String>) -> &'static str {
    match secret {
        Some(_) => "****",
        None => "<unset>",
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        // ---
        let cfg = load_from(lookup(&[])).unwrap();

        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.db, DbConfig::default());
        assert_eq!(cfg.raw_backup_path, PathBuf::from("data/raw_weather.json"));
        assert_eq!(cfg.csv_path(), PathBuf::from("output/cleaned_weather.csv"));
        assert!(!cfg.create_schema);
    }

    #[test]
    fn reads_all_database_parameters() {
        // ---
        let cfg = load_from(lookup(&[
            ("DB_HOST", "db.example.com"),
            ("DB_PORT", "6543"),
            ("DB_NAME", "postgres"),
            ("DB_USER", "etl"),
            ("DB_PASSWORD", "hunter2"),
            ("OPENWEATHER_API_KEY", "KEY"),
        ]))
        .unwrap();

        assert_eq!(cfg.db.host.as_deref(), Some("db.example.com"));
        assert_eq!(cfg.db.port, Some(6543));
        assert_eq!(cfg.db.name.as_deref(), Some("postgres"));
        assert_eq!(cfg.db.user.as_deref(), Some("etl"));
        assert_eq!(cfg.db.password.as_deref(), Some("hunter2"));
        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
    }

    #[test]
    fn empty_values_count_as_unset() {
        // ---
        let cfg = load_from(lookup(&[("DB_HOST", ""), ("OPENWEATHER_API_KEY", "  ")])).unwrap();

        assert_eq!(cfg.db.host, None);
        assert_eq!(cfg.api_key, None);
    }

    #[test]
    fn invalid_port_is_rejected() {
        // ---
        let err = load_from(lookup(&[("DB_PORT", "not-a-port")])).unwrap_err();
        assert!(err.to_string().contains("Invalid DB_PORT"));
    }

    #[test]
    fn create_schema_flag_parses() {
        // ---
        let on = load_from(lookup(&[("ETL_CREATE_SCHEMA", "true")])).unwrap();
        assert!(on.create_schema);

        let off = load_from(lookup(&[("ETL_CREATE_SCHEMA", "0")])).unwrap();
        assert!(!off.create_schema);

        let err = load_from(lookup(&[("ETL_CREATE_SCHEMA", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("Invalid ETL_CREATE_SCHEMA"));
    }

    #[test]
    fn secrets_are_masked() {
        // ---
        assert_eq!(mask(&Some("hunter2".to_string())), "****");
        assert_eq!(mask(&None), "<unset>");
    }
}
