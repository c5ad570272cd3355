//! End-to-end tests for App commands.
//!
//! Most tests drive App with an in-memory lookup double; the last group runs
//! against a mock WeatherAPI server through the real client.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use skycast_core::{App, AppError, Config, StorageBackend};
use skycast_store::{LocationStore, MemoryStorage};
use skycast_weather::{
    Condition, CurrentConditions, CurrentReport, DaySummary, FetchError, Forecast, ForecastDay,
    ForecastReport, ProviderLocation, WeatherLookup, WeatherSnapshot,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn snapshot(name: &str, temp_c: f64) -> WeatherSnapshot {
    let condition = Condition {
        text: "Sunny".to_string(),
        icon: None,
        code: Some(1000),
    };
    WeatherSnapshot {
        current: CurrentReport {
            location: ProviderLocation {
                name: name.to_string(),
                country: "United Kingdom".to_string(),
                region: None,
                localtime: None,
            },
            current: CurrentConditions {
                temp_c,
                temp_f: temp_c * 9.0 / 5.0 + 32.0,
                condition: condition.clone(),
                humidity: 60.0,
                wind_kph: 11.2,
                vis_km: 10.0,
                feelslike_c: temp_c,
                last_updated: "2024-05-01 09:00".to_string(),
            },
        },
        forecast: ForecastReport {
            forecast: Forecast {
                forecastday: vec![ForecastDay {
                    date: chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                    day: DaySummary {
                        maxtemp_c: temp_c + 3.0,
                        mintemp_c: temp_c - 4.0,
                        condition,
                        uv: 5.0,
                        totalprecip_mm: 0.0,
                    },
                }],
            },
        },
    }
}

/// Answers every city except the failing ones, with a temperature that can
/// be changed between calls.
#[derive(Default)]
struct StubLookup {
    failing: Mutex<HashSet<String>>,
    temp_c: Mutex<f64>,
}

impl StubLookup {
    fn fail(&self, city: &str) {
        self.failing.lock().insert(city.to_string());
    }

    fn set_temp(&self, temp_c: f64) {
        *self.temp_c.lock() = temp_c;
    }
}

#[async_trait]
impl WeatherLookup for StubLookup {
    async fn lookup(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        if self.failing.lock().contains(city) {
            return Err(FetchError::Provider {
                status: 400,
                message: "No matching location found.".to_string(),
            });
        }
        Ok(snapshot(city, *self.temp_c.lock()))
    }
}

fn app_with(storage: Arc<MemoryStorage>, lookup: Arc<StubLookup>) -> App {
    let store = LocationStore::load(storage);
    App::new(Config::default(), store, lookup)
}

#[tokio::test]
async fn test_start_seeds_once() {
    let storage = Arc::new(MemoryStorage::new());
    let lookup = Arc::new(StubLookup::default());

    let mut app = app_with(storage.clone(), lookup.clone());
    let report = app.start().await.unwrap();
    assert!(!report.skipped);
    assert_eq!(report.seeded.len(), 4);
    // Last seeded city ends up first
    assert_eq!(app.store().locations()[0].city, "Benin");

    // A second session over the same storage does not seed again
    let mut again = app_with(storage, lookup);
    let report = again.start().await.unwrap();
    assert!(report.skipped);
    assert_eq!(again.store().locations().len(), 4);
}

#[tokio::test]
async fn test_search_saves_and_persists() {
    let storage = Arc::new(MemoryStorage::new());
    let lookup = Arc::new(StubLookup::default());
    let mut app = app_with(storage.clone(), lookup.clone());

    let location = app.search("  Paris ").await.unwrap();
    assert_eq!(location.city, "Paris");
    assert_eq!(app.store().history(), ["Paris".to_string()]);
    assert!(app.error_banner().is_none());

    let reopened = app_with(storage, lookup);
    assert_eq!(reopened.store().locations().len(), 1);
    assert_eq!(reopened.store().locations()[0].id, location.id);
}

#[tokio::test]
async fn test_search_rejects_blank_input() {
    let lookup = Arc::new(StubLookup::default());
    let mut app = app_with(Arc::new(MemoryStorage::new()), lookup);

    let err = app.search("   ").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
    assert!(app.store().locations().is_empty());
    assert!(app.store().history().is_empty());
    assert_eq!(app.error_banner(), Some("Please enter a city name"));
}

#[tokio::test]
async fn test_failed_search_leaves_state_untouched() {
    let lookup = Arc::new(StubLookup::default());
    let mut app = app_with(Arc::new(MemoryStorage::new()), lookup.clone());
    app.search("London").await.unwrap();
    let before = app.snapshot();

    lookup.fail("Atlantis");
    let err = app.search("Atlantis").await.unwrap_err();
    assert!(matches!(err, AppError::Fetch(_)));
    assert_eq!(app.error_banner(), Some("No matching location found."));
    assert_eq!(app.snapshot(), before);

    app.dismiss_error();
    assert!(app.error_banner().is_none());
}

#[tokio::test]
async fn test_successful_search_clears_banner() {
    let lookup = Arc::new(StubLookup::default());
    let mut app = app_with(Arc::new(MemoryStorage::new()), lookup.clone());
    lookup.fail("Atlantis");
    let _ = app.search("Atlantis").await;
    assert!(app.error_banner().is_some());

    app.search("Lagos").await.unwrap();
    assert!(app.error_banner().is_none());
}

#[tokio::test]
async fn test_toggle_favorite_and_remove() {
    let storage = Arc::new(MemoryStorage::new());
    let lookup = Arc::new(StubLookup::default());
    let mut app = app_with(storage.clone(), lookup.clone());
    let london = app.search("london").await.unwrap();

    assert_eq!(app.toggle_favorite(&london.id).unwrap(), Some(true));
    // Favorites use the provider's name, not the typed text
    assert!(app.store().is_favorite("london"));
    assert_eq!(app.store().favorite_locations().len(), 1);

    assert_eq!(app.toggle_favorite(&london.id).unwrap(), Some(false));
    assert!(app.store().favorites().is_empty());

    app.toggle_favorite(&london.id).unwrap();
    assert!(app.remove_location(&london.id).unwrap());
    assert!(!app.remove_location(&london.id).unwrap());
    assert!(app.store().favorite_locations().is_empty());

    let reopened = app_with(storage, lookup);
    assert!(reopened.store().locations().is_empty());
    // The name stays favorited even though the location is gone
    assert_eq!(reopened.store().favorites().len(), 1);
}

#[tokio::test]
async fn test_dark_mode_and_history_persist() {
    let storage = Arc::new(MemoryStorage::new());
    let lookup = Arc::new(StubLookup::default());
    let mut app = app_with(storage.clone(), lookup.clone());

    assert!(app.toggle_dark_mode().unwrap());
    app.search("Abuja").await.unwrap();
    app.clear_history().unwrap();

    let mut reopened = app_with(storage, lookup);
    assert!(reopened.store().dark_mode());
    assert!(reopened.store().history().is_empty());
    assert_eq!(reopened.store().locations().len(), 1);

    reopened.set_dark_mode(false).unwrap();
    assert!(!reopened.store().dark_mode());
}

#[tokio::test]
async fn test_refresh_all_keeps_ids_and_order() {
    let lookup = Arc::new(StubLookup::default());
    lookup.set_temp(10.0);
    let mut app = app_with(Arc::new(MemoryStorage::new()), lookup.clone());
    app.search("London").await.unwrap();
    app.search("Lagos").await.unwrap();
    let ids: Vec<String> = app.store().locations().iter().map(|l| l.id.clone()).collect();
    let history = app.store().history().to_vec();

    lookup.set_temp(21.0);
    lookup.fail("London");
    let refreshed = app.refresh_all().await.unwrap();
    assert_eq!(refreshed, 1);
    assert_eq!(app.error_banner(), Some("No matching location found."));

    let locations = app.store().locations();
    let after: Vec<String> = locations.iter().map(|l| l.id.clone()).collect();
    assert_eq!(after, ids);
    assert_eq!(locations[0].weather.current.temp_c, 21.0);
    assert_eq!(locations[1].weather.current.temp_c, 10.0);
    assert_eq!(app.store().history(), history.as_slice());
}

fn current_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "location": {"name": name, "country": "Nigeria"},
        "current": {
            "last_updated": "2024-05-01 12:15",
            "temp_c": 29.0,
            "temp_f": 84.2,
            "condition": {"text": "Sunny", "code": 1000},
            "wind_kph": 9.0,
            "humidity": 70,
            "vis_km": 10.0,
            "feelslike_c": 33.0
        }
    })
}

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "forecast": {"forecastday": [{
            "date": "2024-05-01",
            "day": {
                "maxtemp_c": 33.0,
                "mintemp_c": 24.0,
                "condition": {"text": "Sunny", "code": 1000},
                "uv": 8.0,
                "totalprecip_mm": 0.0
            }
        }]}
    })
}

fn config_for(server: &MockServer, dir: &std::path::Path, backend: StorageBackend) -> Config {
    let mut config = Config::default();
    config.config_dir = dir.to_path_buf();
    config.provider.base_url = server.uri();
    config.provider.api_key = Some("test-key".to_string());
    config.storage.backend = backend;
    config.storage.data_dir = dir.join("data");
    config.seed.cities = vec!["Lagos".to_string()];
    config
}

#[tokio::test]
async fn test_open_against_mock_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("q", "Lagos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Lagos")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("q", "Lagos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    for backend in [StorageBackend::Sqlite, StorageBackend::File] {
        let config = config_for(&server, dir.path(), backend);
        let mut app = App::open(config.clone()).unwrap();
        let report = app.start().await.unwrap();
        assert_eq!(report.seeded, vec!["Lagos".to_string()]);
        app.shutdown().unwrap();

        let reopened = App::open(config).unwrap();
        assert!(reopened.store().is_seeded());
        assert_eq!(reopened.store().locations().len(), 1);
        assert_eq!(reopened.store().locations()[0].display_name(), "Lagos");
    }
}

#[tokio::test]
async fn test_provider_error_reaches_banner() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {"code": 1006, "message": "No matching location found."}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = App::open(config_for(&server, dir.path(), StorageBackend::File)).unwrap();
    let err = app.search("Nowhere").await.unwrap_err();
    assert!(matches!(err, AppError::Fetch(_)));
    assert_eq!(app.error_banner(), Some("No matching location found."));
    assert!(app.store().locations().is_empty());
}

#[tokio::test]
async fn test_saved_locations_readable_without_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Lagos")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("key", ""))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"code": 1002, "message": "API key is invalid or not provided."}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("key", ""))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"code": 1002, "message": "API key is invalid or not provided."}
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&server, dir.path(), StorageBackend::Sqlite);
    let mut app = App::open(config.clone()).unwrap();
    app.start().await.unwrap();
    app.shutdown().unwrap();

    // Blank key that the env var fallback cannot fill in
    let mut keyless = config;
    keyless.provider.api_key = Some("   ".to_string());
    if std::env::var(skycast_core::config::API_KEY_ENV).is_ok() {
        return;
    }

    let mut app = App::open(keyless).unwrap();
    assert_eq!(app.store().locations().len(), 1);
    assert_eq!(app.store().locations()[0].display_name(), "Lagos");
    assert!(app.toggle_dark_mode().unwrap());

    let err = app.search("Abuja").await.unwrap_err();
    assert!(matches!(err, AppError::Fetch(_)));
    assert_eq!(app.error_banner(), Some("API key is invalid or not provided."));
    assert_eq!(app.store().locations().len(), 1);
}
