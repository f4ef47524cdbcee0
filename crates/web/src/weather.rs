use crate::error::{ServiceError, ServiceResult};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_WEATHER_API_URL: &str = "http://api.openweathermap.org";
pub const DEFAULT_WEATHER_MIRROR_URL: &str = "http://wttr.in";

/// Condition summary and readings for one city, as returned by the
/// OpenWeatherMap `data/2.5/weather` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub main: WeatherReadings,
    pub weather: Vec<WeatherCondition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub description: String,
}

impl CurrentWeather {
    pub fn description(&self) -> Option<&str> {
        self.weather.first().map(|w| w.description.as_str())
    }
}

/// Client for the keyed weather API plus the keyless plain-text mirror.
pub struct WeatherClient {
    http_client: Client,
    api_key: Option<String>,
    api_url: String,
    mirror_url: String,
    timeout: Duration,
}

impl WeatherClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        Self::with_base_urls(
            api_key,
            DEFAULT_WEATHER_API_URL.to_string(),
            DEFAULT_WEATHER_MIRROR_URL.to_string(),
            timeout,
        )
    }

    pub fn with_base_urls(
        api_key: Option<String>,
        api_url: String,
        mirror_url: String,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client: Client::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            mirror_url: mirror_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch current conditions in metric units from the keyed API.
    pub async fn current(&self, city: &str) -> ServiceResult<CurrentWeather> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ServiceError::MissingCredentials("weather API key"))?;

        let endpoint = format!("{}/data/2.5/weather", self.api_url);
        debug!("Requesting current weather for {city}");
        let response = self
            .http_client
            .get(endpoint)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_response(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ServiceError::Format(e.to_string()))
    }

    /// Fetch a one-line "condition temperature humidity" summary from the
    /// keyless mirror.
    pub async fn mirror_summary(&self, city: &str) -> ServiceResult<String> {
        let endpoint = format!(
            "{}/{}?format=%C+%t+%h",
            self.mirror_url,
            utf8_percent_encode(city, NON_ALPHANUMERIC)
        );
        debug!("Requesting weather mirror summary for {city}");
        let response = self
            .http_client
            .get(endpoint)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_response(response).await);
        }

        Ok(response.text().await?.trim().to_string())
    }
}
