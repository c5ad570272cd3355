//! WeatherAPI.com client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::{Endpoint, FetchError};
use crate::types::{CurrentReport, ForecastReport, ProviderErrorBody, WeatherSnapshot};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
pub const DEFAULT_FORECAST_DAYS: u8 = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the weather provider
#[derive(Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: String,
    pub forecast_days: u8,
    pub timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// The key travels as a query parameter; keep it out of debug output.
impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("forecast_days", &self.forecast_days)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Anything that can resolve a city into a weather snapshot.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn lookup(&self, city: &str) -> Result<WeatherSnapshot, FetchError>;
}

#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Arc<Client>,
    settings: ProviderSettings,
}

impl FetchClient {
    pub fn new(settings: ProviderSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client: Arc::new(client),
            settings,
        })
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Current conditions for a city.
    #[instrument(skip(self), level = "info")]
    pub async fn current(&self, city: &str) -> Result<CurrentReport, FetchError> {
        self.get_json(
            Endpoint::Current,
            "current.json",
            &[("key", self.settings.api_key.as_str()), ("q", city), ("aqi", "no")],
        )
        .await
    }

    /// N-day forecast for a city.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast(&self, city: &str) -> Result<ForecastReport, FetchError> {
        let days = self.settings.forecast_days.to_string();
        self.get_json(
            Endpoint::Forecast,
            "forecast.json",
            &[
                ("key", self.settings.api_key.as_str()),
                ("q", city),
                ("days", days.as_str()),
                ("aqi", "no"),
                ("alerts", "no"),
            ],
        )
        .await
    }

    /// Both lookups for one city. Fails as a whole if either request fails.
    pub async fn lookup(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        let (current, forecast) = tokio::try_join!(self.current(city), self.forecast(city))?;
        Ok(WeatherSnapshot { current, forecast })
    }

    /// Issue a GET and decode the body, mapping every failure to a FetchError.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!("{} request failed: {}", endpoint.label(), e);
                FetchError::Transport { endpoint, source: e }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .and_then(|d| d.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| endpoint.not_found_message().to_string());
            tracing::warn!("{} lookup returned {}: {}", endpoint.label(), status, message);
            return Err(FetchError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!("Failed to read {} response: {}", endpoint.label(), e);
            FetchError::Transport { endpoint, source: e }
        })?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("Malformed {} payload: {}", endpoint.label(), e);
            FetchError::InvalidData {
                endpoint,
                detail: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl WeatherLookup for FetchClient {
    async fn lookup(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        FetchClient::lookup(self, city).await
    }
}
