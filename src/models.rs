//! Simple data models for the weather ETL job.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---

/// Raw provider response for one city, kept exactly as received.
///
/// The provider's shape is only partially known, so this stays an opaque
/// JSON value; the projection below reads the few fields it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawObservation(Value);

/// Flat weather record, one per raw observation.
///
/// Every field is nullable: a partial provider response yields `None`
/// instead of an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WeatherRecord {
    // ---
    pub city_name: Option<String>,
    pub temperature: Option<f64>,
    pub humidity: Option<i32>,
    pub weather_description: Option<String>,
}

impl WeatherRecord {
    /// Column names in table and CSV order.
    pub const COLUMNS: [&'static str; 4] =
        ["city_name", "temperature", "humidity", "weather_description"];
}

/// Ordered records, in the order the observations were fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherTable {
    records: Vec<WeatherRecord>,
}

impl RawObservation {
    // ---
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Project the provider payload into a [`WeatherRecord`].
    pub fn to_record(&self) -> WeatherRecord {
        // ---
        let main = self.0.get("main");

        WeatherRecord {
            city_name: self.0.get("name").and_then(Value::as_str).map(String::from),
            temperature: main.and_then(|m| m.get("temp")).and_then(Value::as_f64),
            humidity: main
                .and_then(|m| m.get("humidity"))
                .and_then(Value::as_i64)
                .and_then(|h| i32::try_from(h).ok()),
            weather_description: self
                .0
                .get("weather")
                .and_then(|w| w.get(0))
                .and_then(|w| w.get("description"))
                .and_then(Value::as_str)
                .map(String::from),
        }
    }
}

impl WeatherTable {
    // ---
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeatherRecord> {
        self.records.iter()
    }
}

impl From<Vec<WeatherRecord>> for WeatherTable {
    fn from(records: Vec<WeatherRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<WeatherRecord> for WeatherTable {
    fn from_iter<I: IntoIterator<Item = WeatherRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a WeatherTable {
    type Item = &'a WeatherRecord;
    type IntoIter = std::slice::Iter<'a, WeatherRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serde_json::json;

    fn london() -> RawObservation {
        // ---
        RawObservation::new(json!({
            "name": "London",
            "main": { "temp": 15.2, "humidity": 70 },
            "weather": [{ "description": "cloudy" }]
        }))
    }

    #[test]
    fn test_full_projection() {
        // ---
        let record = london().to_record();

        assert_eq!(record.city_name.as_deref(), Some("London"));
        assert_eq!(record.temperature, Some(15.2));
        assert_eq!(record.humidity, Some(70));
        assert_eq!(record.weather_description.as_deref(), Some("cloudy"));
    }

    #[test]
    fn test_missing_name() {
        // ---
        let raw = RawObservation::new(json!({
            "main": { "temp": 1.5, "humidity": 40 },
            "weather": [{ "description": "snow" }]
        }));
        let record = raw.to_record();

        assert_eq!(record.city_name, None);
        assert_eq!(record.temperature, Some(1.5));
        assert_eq!(record.humidity, Some(40));
        assert_eq!(record.weather_description.as_deref(), Some("snow"));
    }

    #[test]
    fn test_missing_main_nulls_both_measurements() {
        // ---
        let raw = RawObservation::new(json!({
            "name": "Tokyo",
            "weather": [{ "description": "clear sky" }]
        }));
        let record = raw.to_record();

        assert_eq!(record.city_name.as_deref(), Some("Tokyo"));
        assert_eq!(record.temperature, None);
        assert_eq!(record.humidity, None);
        assert_eq!(record.weather_description.as_deref(), Some("clear sky"));
    }

    #[test]
    fn test_missing_temp_or_humidity_individually() {
        // ---
        let no_temp = RawObservation::new(json!({"name": "Delhi", "main": {"humidity": 33}}));
        let record = no_temp.to_record();
        assert_eq!(record.temperature, None);
        assert_eq!(record.humidity, Some(33));

        let no_humidity = RawObservation::new(json!({"name": "Delhi", "main": {"temp": 31.0}}));
        let record = no_humidity.to_record();
        assert_eq!(record.temperature, Some(31.0));
        assert_eq!(record.humidity, None);
    }

    #[test]
    fn test_weather_array_edge_cases() {
        // ---
        // Absent array
        let absent = RawObservation::new(json!({"name": "Sydney"}));
        assert_eq!(absent.to_record().weather_description, None);

        // Empty array
        let empty = RawObservation::new(json!({"name": "Sydney", "weather": []}));
        assert_eq!(empty.to_record().weather_description, None);

        // First element without description
        let bare = RawObservation::new(json!({"name": "Sydney", "weather": [{"main": "Rain"}]}));
        assert_eq!(bare.to_record().weather_description, None);

        // Only the first element is consulted
        let many = RawObservation::new(json!({
            "weather": [{"description": "mist"}, {"description": "haze"}]
        }));
        assert_eq!(many.to_record().weather_description.as_deref(), Some("mist"));
    }

    #[test]
    fn test_integer_temperature_and_non_integer_humidity() {
        // ---
        let raw = RawObservation::new(json!({"main": {"temp": 15, "humidity": 70.5}}));
        let record = raw.to_record();

        assert_eq!(record.temperature, Some(15.0));
        assert_eq!(record.humidity, None);
    }

    #[test]
    fn test_non_object_payload() {
        // ---
        let raw = RawObservation::new(json!("unexpected"));
        let record = raw.to_record();

        assert_eq!(
            record,
            WeatherRecord {
                city_name: None,
                temperature: None,
                humidity: None,
                weather_description: None,
            }
        );
    }

    #[test]
    fn test_raw_observation_is_transparent() {
        // ---
        let raw = london();
        let encoded = serde_json::to_value(&raw).unwrap();
        assert_eq!(&encoded, raw.as_value());
    }
}
