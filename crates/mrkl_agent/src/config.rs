use crate::settings::{self, AgentSettings};
use std::time::Duration;
use tracing::warn;

/// Placeholder value shipped in sample `.env` files; treated as "no key".
const WEATHER_KEY_PLACEHOLDER: &str = "your_openweather_api_key_here";

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Base URLs of every external service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub weather_api_url: String,
    pub weather_mirror_url: String,
    pub serpapi_url: String,
    pub wikipedia_api_url: String,
    pub inference_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            weather_api_url: web::DEFAULT_WEATHER_API_URL.to_string(),
            weather_mirror_url: web::DEFAULT_WEATHER_MIRROR_URL.to_string(),
            serpapi_url: web::DEFAULT_SERPAPI_URL.to_string(),
            wikipedia_api_url: web::DEFAULT_WIKIPEDIA_API_URL.to_string(),
            inference_url: web::DEFAULT_INFERENCE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub openweather_api_key: Option<String>,
    pub serpapi_key: Option<String>,
    pub huggingface_token: Option<String>,
    pub history_capacity: usize,
    pub endpoints: Endpoints,
    pub weather_timeout: Duration,
    pub search_timeout: Duration,
    pub inference_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            openweather_api_key: None,
            serpapi_key: None,
            huggingface_token: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            endpoints: Endpoints::default(),
            weather_timeout: Duration::from_secs(10),
            search_timeout: Duration::from_secs(15),
            inference_timeout: Duration::from_secs(30),
        }
    }
}

impl AgentConfig {
    /// Loads `.env`, the optional settings file and the process environment.
    pub fn from_env() -> Self {
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!("No .env file loaded: {e}");
        }
        Self::resolve(settings::get_settings(), |name| std::env::var(name).ok())
    }

    /// Merges settings with variables from `lookup`; variables win.
    pub fn resolve(settings: &AgentSettings, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secret = |var: &str, fallback: &Option<String>| {
            lookup(var)
                .or_else(|| fallback.clone())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let history_capacity = match lookup("MRKL_HISTORY_CAPACITY") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!("Ignoring invalid MRKL_HISTORY_CAPACITY value {raw:?}");
                    settings.history_capacity.unwrap_or(DEFAULT_HISTORY_CAPACITY)
                }
            },
            None => settings.history_capacity.unwrap_or(DEFAULT_HISTORY_CAPACITY),
        }
        .max(1);

        let defaults = Endpoints::default();
        let endpoint = |value: &Option<String>, default: String| value.clone().unwrap_or(default);

        Self {
            openweather_api_key: secret("OPENWEATHER_API_KEY", &settings.openweather_api_key),
            serpapi_key: secret("SERPAPI_KEY", &settings.serpapi_key),
            huggingface_token: secret("HUGGINGFACE_API_TOKEN", &settings.huggingface_api_token),
            history_capacity,
            endpoints: Endpoints {
                weather_api_url: endpoint(&settings.weather_api_url, defaults.weather_api_url),
                weather_mirror_url: endpoint(
                    &settings.weather_mirror_url,
                    defaults.weather_mirror_url,
                ),
                serpapi_url: endpoint(&settings.serpapi_url, defaults.serpapi_url),
                wikipedia_api_url: endpoint(&settings.wikipedia_api_url, defaults.wikipedia_api_url),
                inference_url: endpoint(&settings.inference_url, defaults.inference_url),
            },
            ..Self::default()
        }
    }

    /// The weather key, unless it is missing or still the sample placeholder.
    pub fn weather_api_key(&self) -> Option<&str> {
        self.openweather_api_key
            .as_deref()
            .filter(|key| *key != WEATHER_KEY_PLACEHOLDER)
    }
}
