//! Extract stage: one sequential provider request per city.
//!
//! Successful JSON payloads are collected in input order and written to the
//! raw backup file before being returned. Any per-city failure (non-success
//! status, transport error, unparsable body) drops that city with a warning
//! and the batch continues.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::{models::RawObservation, Config};

// ---

/// Result of fetching one city.
#[derive(Debug)]
pub enum FetchOutcome {
    // ---
    Fetched(RawObservation),
    /// Provider answered with a non-success status.
    Rejected { status: StatusCode, body: String },
    /// Request never completed or the body was not JSON.
    Failed(anyhow::Error),
}

/// Thin client for the weather provider's current-conditions endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    // ---
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Fetch current conditions for a single city.
    pub async fn fetch_city(&self, city: &str) -> FetchOutcome {
        // ---
        let mut params = vec![("q", city)];
        if let Some(key) = self.api_key.as_deref() {
            params.push(("appid", key));
        }
        params.push(("units", "metric"));

        let res = match self
            .http
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("Failed to send weather request for {city}"))
        {
            Ok(res) => res,
            Err(e) => return FetchOutcome::Failed(e),
        };

        let status = res.status();
        let body = match res
            .text()
            .await
            .with_context(|| format!("Failed to read weather response body for {city}"))
        {
            Ok(body) => body,
            Err(e) => return FetchOutcome::Failed(e),
        };

        if !status.is_success() {
            return FetchOutcome::Rejected {
                status,
                body: truncate_body(&body),
            };
        }

        match serde_json::from_str::<RawObservation>(&body)
            .with_context(|| format!("Failed to parse weather JSON for {city}"))
        {
            Ok(raw) => FetchOutcome::Fetched(raw),
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}

/// Fetch every city in order, keep the successes, and write the raw backup.
///
/// The returned list is a subsequence of `cities` in the same order. Errors
/// are only returned for the backup write; per-city problems are logged.
pub async fn fetch_weather_data(
    client: &WeatherClient,
    cities: &[String],
    raw_backup_path: &Path,
) -> Result<Vec<RawObservation>> {
    // ---
    let mut all_weather_data = Vec::with_capacity(cities.len());

    for city in cities {
        tracing::debug!("Fetching weather for {}", city);

        match client.fetch_city(city).await {
            FetchOutcome::Fetched(raw) => all_weather_data.push(raw),
            FetchOutcome::Rejected { status, body } => {
                tracing::warn!(
                    "Failed to fetch weather data for {}: status {}: {}",
                    city,
                    status,
                    body
                );
            }
            FetchOutcome::Failed(e) => {
                tracing::warn!("Failed to fetch weather data for {}: {:#}", city, e);
            }
        }
    }

    tracing::info!(
        "Fetched {} of {} cities",
        all_weather_data.len(),
        cities.len()
    );

    save_raw_backup(&all_weather_data, raw_backup_path)?;

    Ok(all_weather_data)
}

/// Write observations as a 4-space indented JSON array, replacing the file.
///
/// The parent directory is not created.
pub fn save_raw_backup(observations: &[RawObservation], path: &Path) -> Result<()> {
    // ---
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    observations
        .serialize(&mut ser)
        .context("Failed to serialize raw weather data")?;

    fs::write(path, buf)
        .with_context(|| format!("Failed to write raw backup: {}", path.display()))?;

    tracing::debug!("Raw backup written to {}", path.display());
    Ok(())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
