//! HTTP clients for the external services the MRKL tools depend on.
//!
//! Every client takes its base URL as a constructor argument so tests (and
//! self-hosted mirrors) can point it somewhere else, and every request is
//! bounded by a per-client timeout.

mod error;
mod inference;
mod serp;
mod weather;
mod wikipedia;
#[cfg(any(test, feature = "test-util"))]
pub mod test_util;

pub use error::ServiceError;
pub use inference::{GenerationParameters, InferenceClient, DEFAULT_INFERENCE_URL};
pub use serp::{SerpApiClient, SerpResponse, SerpResult, DEFAULT_SERPAPI_URL};
pub use weather::{
    CurrentWeather, WeatherClient, WeatherCondition, WeatherReadings, DEFAULT_WEATHER_API_URL,
    DEFAULT_WEATHER_MIRROR_URL,
};
pub use wikipedia::{WikiPage, WikipediaClient, DEFAULT_WIKIPEDIA_API_URL};
