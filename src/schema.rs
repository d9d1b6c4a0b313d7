//! Database schema management for `weatherflow-etl`.
//!
//! The `weather_data` table is normally provisioned outside this job. When
//! asked to (`--create-schema` / `ETL_CREATE_SCHEMA`), the loader calls
//! [`create_schema`] on its connection before inserting.

use sqlx::PgConnection;

// ---

/// Create the `weather_data` table if it does not exist (idempotent).
///
/// `id` and `timestamp` are server generated; the loader only ever writes
/// the four weather columns.
pub async fn create_schema(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    // ---
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS weather_data (
            id                  SERIAL PRIMARY KEY,
            city_name           TEXT,
            temperature         DOUBLE PRECISION,
            humidity            INTEGER,
            weather_description TEXT,
            timestamp           TIMESTAMPTZ NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(&mut *conn)
    .await?;

    tracing::debug!("Schema ensured for weather_data");
    Ok(())
}
