use std::path::Path;

use serde_json::{json, Value};
use weatherflow_etl::{config, Config};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub const API_PATH: &str = "/data/2.5/weather";
pub const API_KEY: &str = "TEST_KEY";

/// Config pointing at a mock provider, a closed database port, and a
/// scratch directory (with `data/` already present).
pub fn test_config(api_base: &str, root: &Path) -> Config {
    std::fs::create_dir_all(root.join("data")).unwrap();

    let mut cfg = config::load_from(|_| None).unwrap();
    cfg.api_key = Some(API_KEY.to_string());
    cfg.api_url = format!("{api_base}{API_PATH}");
    cfg.db.host = Some("127.0.0.1".to_string());
    cfg.db.port = Some(1);
    cfg.db.name = Some("weather".to_string());
    cfg.db.user = Some("etl".to_string());
    cfg.db.password = Some("secret".to_string());
    cfg.raw_backup_path = root.join("data").join("raw_weather.json");
    cfg.output_dir = root.join("output");
    cfg
}

pub fn observation(name: &str, temp: f64, humidity: i64, description: &str) -> Value {
    json!({
        "name": name,
        "main": { "temp": temp, "humidity": humidity },
        "weather": [{ "description": description }]
    })
}

pub async fn mount_city(server: &MockServer, city: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("q", city))
        .and(query_param("appid", API_KEY))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

pub fn cities(names: &[&str]) -> Vec<String> {
    names.iter().map(|c| c.to_string()).collect()
}
