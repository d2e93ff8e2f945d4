//! Unit tests for configuration module

use std::io::Write;
use travelbot_gateway::config::Settings;

fn valid_settings() -> Settings {
    let mut settings = Settings::default();
    settings.flights.api_key = "client-id".to_string();
    settings.flights.api_secret = "client-secret".to_string();
    settings.images.api_key = "pixabay-key".to_string();
    settings.chat.api_key = "sk-test".to_string();
    settings
}

#[test]
fn test_default_settings() {
    let settings = Settings::default();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 4000);
    assert_eq!(settings.images.per_page, 5);
    assert_eq!(settings.flights.adults, 1);
    assert_eq!(settings.logging.format, "json");
}

#[test]
fn test_settings_validation_valid() {
    assert!(valid_settings().validate().is_ok());
}

#[test]
fn test_settings_validation_invalid_port() {
    let mut settings = valid_settings();
    settings.server.port = 0;

    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_missing_credentials() {
    let mut settings = valid_settings();
    settings.flights.api_secret.clear();
    assert!(settings.validate().is_err());

    let mut settings = valid_settings();
    settings.images.api_key.clear();
    assert!(settings.validate().is_err());

    let mut settings = valid_settings();
    settings.chat.api_key.clear();
    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_zero_timeout() {
    let mut settings = valid_settings();
    settings.chat.timeout_ms = 0;

    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_request_timeout_must_exceed_upstreams() {
    let mut settings = valid_settings();
    settings.server.request_timeout_secs = 60;
    settings.chat.timeout_ms = 60_000;
    assert!(settings.validate().is_err());

    // Token and search run back to back
    let mut settings = valid_settings();
    settings.server.request_timeout_secs = 30;
    settings.flights.timeout_ms = 15_000;
    settings.chat.timeout_ms = 10_000;
    assert!(settings.validate().is_err());

    settings.server.request_timeout_secs = 31;
    assert!(settings.validate().is_ok());
}

#[test]
fn test_settings_validation_invalid_cors_origin() {
    let mut settings = valid_settings();
    settings.cors.allowed_origins = vec!["http://ok.example".to_string(), "bad\norigin".to_string()];

    assert!(settings.validate().is_err());
}

#[test]
fn test_load_from_yaml_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        r#"
server:
  port: 4100
cors:
  allowed_origins:
    - "https://travel.example"
flights:
  base_url: "http://flights.local"
  cache_token: true
chat:
  model: "gpt-4o-mini"
  timeout_ms: 15000
"#
    )
    .unwrap();

    let settings = Settings::load_from_path(file.path()).unwrap();

    assert_eq!(settings.server.port, 4100);
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.cors.allowed_origins, vec!["https://travel.example"]);
    assert_eq!(
        settings.flights.search_url(),
        "http://flights.local/v2/shopping/flight-offers"
    );
    assert!(settings.flights.cache_token);
    assert_eq!(settings.chat.model, "gpt-4o-mini");
    assert_eq!(settings.chat.timeout_ms, 15000);
    // Untouched sections keep their defaults
    assert_eq!(settings.images.base_url, "https://pixabay.com/api/");
    assert!(settings.chat.place_persona.contains("TravelBot"));
}

#[test]
fn test_load_without_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load_from_path(dir.path().join("missing.yaml")).unwrap();

    assert_eq!(settings.chat.base_url, "https://api.openai.com/v1");
    assert_eq!(settings.images.timeout_ms, 5000);
}
