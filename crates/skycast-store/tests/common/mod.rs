//! Shared fixtures for skycast-store integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use skycast_weather::{
    Condition, CurrentConditions, CurrentReport, DaySummary, FetchError, Forecast, ForecastDay,
    ForecastReport, ProviderLocation, WeatherLookup, WeatherSnapshot,
};

pub fn snapshot(name: &str, temp_c: f64) -> WeatherSnapshot {
    let condition = Condition {
        text: "Partly cloudy".to_string(),
        icon: Some("//cdn.weatherapi.com/116.png".to_string()),
        code: Some(1003),
    };
    WeatherSnapshot {
        current: CurrentReport {
            location: ProviderLocation {
                name: name.to_string(),
                country: "Nigeria".to_string(),
                region: Some("Lagos".to_string()),
                localtime: Some("2024-05-01 12:30".to_string()),
            },
            current: CurrentConditions {
                temp_c,
                temp_f: 80.0,
                condition: condition.clone(),
                humidity: 74.0,
                wind_kph: 9.4,
                vis_km: 10.0,
                feelslike_c: temp_c + 1.5,
                last_updated: "2024-05-01 12:15".to_string(),
            },
        },
        forecast: ForecastReport {
            forecast: Forecast {
                forecastday: vec![ForecastDay {
                    date: chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                    day: DaySummary {
                        maxtemp_c: 32.5,
                        mintemp_c: 24.5,
                        condition,
                        uv: 7.0,
                        totalprecip_mm: 2.5,
                    },
                }],
            },
        },
    }
}

/// Lookup double that records every call and fails for chosen cities.
#[derive(Default)]
pub struct FakeLookup {
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
    failing: HashSet<String>,
}

impl FakeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(cities: &[&str]) -> Self {
        Self {
            failing: cities.iter().map(|c| c.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl WeatherLookup for FakeLookup {
    async fn lookup(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(city.to_string());
        if self.failing.contains(city) {
            return Err(FetchError::Provider {
                status: 400,
                message: "No matching location found.".to_string(),
            });
        }
        Ok(snapshot(city, 28.0))
    }
}

pub fn seed_cities() -> Vec<String> {
    skycast_store::DEFAULT_SEED_CITIES
        .iter()
        .map(|c| c.to_string())
        .collect()
}
