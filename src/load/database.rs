//! PostgreSQL sink: one connection, one transaction, one commit per run.
//!
//! Failures come back as [`LoadError`] so the caller can decide whether a
//! failed load ends the run; the pipeline driver only logs it.

use sqlx::{
    postgres::{PgConnectOptions, PgConnection},
    Connection,
};
use thiserror::Error;

use crate::{config::DbConfig, models::WeatherTable, schema, Config};

// ---

/// Destination table; `id` and `timestamp` are filled in by the server.
pub const TABLE_NAME: &str = "weather_data";

const INSERT_SQL: &str = r#"
    INSERT INTO weather_data (city_name, temperature, humidity, weather_description)
    VALUES ($1, $2, $3, $4)
"#;

/// Why a database load did not commit.
///
/// Any of these means no row from the run was persisted.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("failed to start transaction: {0}")]
    Begin(#[source] sqlx::Error),

    #[error("failed to create schema: {0}")]
    Schema(#[source] sqlx::Error),

    #[error("failed to insert record {index}: {source}")]
    Insert {
        index: usize,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to commit: {0}")]
    Commit(#[source] sqlx::Error),
}

/// Build connection options from the externally supplied parameters.
///
/// Unset values keep the driver defaults (`PGHOST`, `PGPORT`, ... then
/// `localhost:5432`), so a missing setting shows up as a connection failure.
pub fn connect_options(db: &DbConfig) -> PgConnectOptions {
    // ---
    let mut opts = PgConnectOptions::new();
    if let Some(host) = &db.host {
        opts = opts.host(host);
    }
    if let Some(port) = db.port {
        opts = opts.port(port);
    }
    if let Some(name) = &db.name {
        opts = opts.database(name);
    }
    if let Some(user) = &db.user {
        opts = opts.username(user);
    }
    if let Some(password) = &db.password {
        opts = opts.password(password);
    }
    opts
}

/// Insert every record over one connection and commit once at the end.
///
/// Returns the number of rows committed. The caller decides whether a
/// [`LoadError`] is fatal; the pipeline driver only logs it.
pub async fn load_to_database(config: &Config, table: &WeatherTable) -> Result<usize, LoadError> {
    // ---
    let opts = connect_options(&config.db);
    let mut conn = PgConnection::connect_with(&opts)
        .await
        .map_err(LoadError::Connect)?;

    tracing::debug!("Connected to database, inserting {} records", table.len());

    if config.create_schema {
        schema::create_schema(&mut conn)
            .await
            .map_err(LoadError::Schema)?;
    }

    let mut tx = conn.begin().await.map_err(LoadError::Begin)?;

    for (index, record) in table.iter().enumerate() {
        sqlx::query(INSERT_SQL)
            .bind(record.city_name.as_deref())
            .bind(record.temperature)
            .bind(record.humidity)
            .bind(record.weather_description.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(|source| LoadError::Insert { index, source })?;
    }

    tx.commit().await.map_err(LoadError::Commit)?;

    if let Err(e) = conn.close().await {
        tracing::debug!("Error closing database connection: {}", e);
    }

    tracing::info!(
        "Data loaded into database successfully ({} rows into {})",
        table.len(),
        TABLE_NAME
    );
    Ok(table.len())
}
