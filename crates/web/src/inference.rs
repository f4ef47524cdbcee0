use crate::error::{ServiceError, ServiceResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_INFERENCE_URL: &str =
    "https://api-inference.huggingface.co/models/microsoft/DialoGPT-large";

/// Sampling parameters sent along with the prompt.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub do_sample: bool,
    pub return_full_text: bool,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: 100,
            temperature: 0.7,
            do_sample: true,
            return_full_text: false,
        }
    }
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParameters,
}

#[derive(Deserialize)]
struct Generation {
    #[serde(default)]
    generated_text: String,
}

/// Client for a hosted text-generation model endpoint.
pub struct InferenceClient {
    http_client: Client,
    token: String,
    url: String,
    timeout: Duration,
}

impl InferenceClient {
    pub fn new(token: String, timeout: Duration) -> Self {
        Self::with_base_url(token, DEFAULT_INFERENCE_URL.to_string(), timeout)
    }

    pub fn with_base_url(token: String, url: String, timeout: Duration) -> Self {
        Self {
            http_client: Client::new(),
            token,
            url,
            timeout,
        }
    }

    /// Returns the first non-empty generated text, or `None` when the model
    /// produced nothing usable.
    pub async fn generate(
        &self,
        prompt: &str,
        parameters: &GenerationParameters,
    ) -> ServiceResult<Option<String>> {
        debug!("Sending {} prompt chars to hosted model", prompt.len());
        let response = self
            .http_client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&GenerationRequest {
                inputs: prompt,
                parameters,
            })
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_response(response).await);
        }

        let body = response.text().await?;
        let generations: Vec<Generation> =
            serde_json::from_str(&body).map_err(|e| ServiceError::Format(e.to_string()))?;

        Ok(generations
            .into_iter()
            .map(|g| g.generated_text.trim().to_string())
            .find(|text| !text.is_empty()))
    }
}
