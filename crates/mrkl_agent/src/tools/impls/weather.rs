use crate::config::AgentConfig;
use crate::params::title_case;
use crate::tools::core::{Render, Tool, ToolResult, ToolSpec};
use crate::types::ToolId;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use web::WeatherClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum WeatherOutput {
    /// Readings from the keyed provider
    Provider {
        city: String,
        temperature: f64,
        feels_like: f64,
        description: String,
        humidity: f64,
    },
    /// One-line summary from the keyless mirror
    Mirror { city: String, conditions: String },
    Unavailable { message: String },
}

impl Render for WeatherOutput {
    fn status(&self) -> String {
        match self {
            WeatherOutput::Provider { city, .. } | WeatherOutput::Mirror { city, .. } => {
                format!("Weather retrieved for {city}")
            }
            WeatherOutput::Unavailable { message } => message.clone(),
        }
    }

    fn render(&self) -> String {
        match self {
            WeatherOutput::Provider {
                city,
                temperature,
                feels_like,
                description,
                humidity,
            } => format!(
                "Current weather in {city}: {temperature}°C (feels like {feels_like}°C), {description}, Humidity: {humidity}%"
            ),
            WeatherOutput::Mirror { city, conditions } => {
                format!("Current weather in {city}: {conditions}")
            }
            WeatherOutput::Unavailable { message } => message.clone(),
        }
    }
}

impl ToolResult for WeatherOutput {
    fn is_success(&self) -> bool {
        !matches!(self, WeatherOutput::Unavailable { .. })
    }
}

pub struct WeatherTool {
    client: WeatherClient,
}

impl WeatherTool {
    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(WeatherClient::with_base_urls(
            config.weather_api_key().map(str::to_string),
            config.endpoints.weather_api_url.clone(),
            config.endpoints.weather_mirror_url.clone(),
            config.weather_timeout,
        ))
    }

    async fn from_mirror(&self, city: &str) -> WeatherOutput {
        match self.client.mirror_summary(city).await {
            Ok(conditions) => WeatherOutput::Mirror {
                city: title_case(city),
                conditions,
            },
            Err(e) if e.is_status() => {
                warn!("Weather mirror rejected {city}: {e}");
                WeatherOutput::Unavailable {
                    message: format!("Could not get weather for {city}"),
                }
            }
            Err(e) => {
                warn!("Weather mirror unreachable: {e}");
                WeatherOutput::Unavailable {
                    message: format!("Weather service temporarily unavailable for {city}"),
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl Tool for WeatherTool {
    type Output = WeatherOutput;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            id: ToolId::Weather,
            name: "weather",
            description: "Get current weather information for any city. Input should be a city name like 'London' or 'New York'",
        }
    }

    async fn execute(&self, input: &str) -> Result<Self::Output> {
        let city = input.trim();
        if !self.client.has_api_key() {
            info!("No weather API key configured, using mirror for {city}");
            return Ok(self.from_mirror(city).await);
        }

        let provider_message = match self.client.current(city).await {
            Ok(weather) => {
                return Ok(WeatherOutput::Provider {
                    city: title_case(city),
                    temperature: weather.main.temp,
                    feels_like: weather.main.feels_like,
                    description: title_case(weather.description().unwrap_or_default()),
                    humidity: weather.main.humidity,
                })
            }
            Err(e) if e.is_status() => {
                warn!("Weather provider rejected {city}: {e}");
                format!("Could not get weather for {city}. Please check city name.")
            }
            Err(e) => {
                warn!("Weather provider failed: {e}");
                format!("Error getting weather for {city}: {e}")
            }
        };

        info!("Trying weather mirror for {city}");
        Ok(match self.from_mirror(city).await {
            mirror @ WeatherOutput::Mirror { .. } => mirror,
            _ => WeatherOutput::Unavailable {
                message: provider_message,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use web::test_util::spawn_mock_server;
    use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::time::Duration;

    fn tool(base_url: &str, api_key: Option<&str>) -> WeatherTool {
        WeatherTool::new(WeatherClient::with_base_urls(
            api_key.map(str::to_string),
            base_url.to_string(),
            base_url.to_string(),
            Duration::from_secs(5),
        ))
    }

    #[tokio::test]
    async fn test_provider_report() {
        let app = Router::new().route(
            "/data/2.5/weather",
            get(|| async {
                Json(json!({
                    "main": {"temp": 18.5, "feels_like": 17, "humidity": 72},
                    "weather": [{"description": "broken clouds"}]
                }))
            }),
        );
        let base_url = spawn_mock_server(app).await;

        let output = tool(&base_url, Some("key")).execute("new york").await.unwrap();
        assert!(output.is_success());
        assert_eq!(
            output.render(),
            "Current weather in New York: 18.5°C (feels like 17°C), Broken Clouds, Humidity: 72%"
        );
    }

    #[tokio::test]
    async fn test_provider_unknown_city() {
        let app = Router::new().route(
            "/data/2.5/weather",
            get(|| async { (StatusCode::NOT_FOUND, "city not found") }),
        );
        let base_url = spawn_mock_server(app).await;

        let output = tool(&base_url, Some("key")).execute("Atlantis").await.unwrap();
        assert!(!output.is_success());
        assert_eq!(
            output.render(),
            "Could not get weather for Atlantis. Please check city name."
        );
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_mirror() {
        let app = Router::new()
            .route(
                "/data/2.5/weather",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
            )
            .route("/:city", get(|| async { "Light rain +9°C 90%" }));
        let base_url = spawn_mock_server(app).await;

        let output = tool(&base_url, Some("key")).execute("oslo").await.unwrap();
        assert!(output.is_success());
        assert!(matches!(output, WeatherOutput::Mirror { .. }));
        assert_eq!(output.render(), "Current weather in Oslo: Light rain +9°C 90%");
    }

    #[tokio::test]
    async fn test_provider_and_mirror_unreachable() {
        let output = tool("http://127.0.0.1:9", Some("key")).execute("Oslo").await.unwrap();
        assert!(!output.is_success());
        assert!(output.render().starts_with("Error getting weather for Oslo: "));
    }

    #[tokio::test]
    async fn test_mirror_without_key() {
        let app = Router::new().route(
            "/:city",
            get(|Path(city): Path<String>| async move {
                assert_eq!(city, "paris");
                "Partly cloudy +12°C 81%\n"
            }),
        );
        let base_url = spawn_mock_server(app).await;

        let output = tool(&base_url, None).execute("paris").await.unwrap();
        assert_eq!(
            output.render(),
            "Current weather in Paris: Partly cloudy +12°C 81%"
        );
    }

    #[tokio::test]
    async fn test_mirror_error_status() {
        let app = Router::new().route(
            "/:city",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let base_url = spawn_mock_server(app).await;

        let output = tool(&base_url, None).execute("Paris").await.unwrap();
        assert_eq!(output.render(), "Could not get weather for Paris");
    }

    #[tokio::test]
    async fn test_mirror_unreachable() {
        let output = tool("http://127.0.0.1:9", None).execute("Paris").await.unwrap();
        assert!(!output.is_success());
        assert_eq!(
            output.render(),
            "Weather service temporarily unavailable for Paris"
        );
    }
}
