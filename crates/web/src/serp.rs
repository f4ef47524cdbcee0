use crate::error::{ServiceError, ServiceResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_SERPAPI_URL: &str = "https://serpapi.com";

/// A single organic or news hit. SerpAPI omits fields freely, so all of them
/// are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerpResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerpResponse {
    #[serde(default)]
    pub organic_results: Vec<SerpResult>,
    #[serde(default)]
    pub news_results: Vec<SerpResult>,
}

/// Google web and news search through SerpAPI.
pub struct SerpApiClient {
    http_client: Client,
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl SerpApiClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        Self::with_base_url(api_key, DEFAULT_SERPAPI_URL.to_string(), timeout)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: String, timeout: Duration) -> Self {
        Self {
            http_client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Regular web search, `num` organic results requested.
    pub async fn search(&self, query: &str, num: u32) -> ServiceResult<SerpResponse> {
        self.request(query, num, None).await
    }

    /// Google News search (`tbm=nws`).
    pub async fn news(&self, query: &str, num: u32) -> ServiceResult<SerpResponse> {
        self.request(query, num, Some("nws")).await
    }

    async fn request(&self, query: &str, num: u32, tbm: Option<&str>) -> ServiceResult<SerpResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ServiceError::MissingCredentials("SerpAPI key"))?;

        let num = num.to_string();
        let mut params = vec![
            ("q", query),
            ("api_key", api_key),
            ("engine", "google"),
            ("num", num.as_str()),
        ];
        if let Some(tbm) = tbm {
            params.push(("tbm", tbm));
        }

        debug!("SerpAPI request q={query:?} tbm={tbm:?}");
        let response = self
            .http_client
            .get(format!("{}/search", self.base_url))
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_response(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ServiceError::Format(e.to_string()))
    }
}
