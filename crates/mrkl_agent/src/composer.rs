use async_trait::async_trait;
use tracing::{debug, warn};
use web::{GenerationParameters, InferenceClient};

/// Turns a raw tool result into the text shown to the user.
#[async_trait]
pub trait ResponseComposer: Send + Sync {
    async fn compose(&self, query: &str, tool_result: &str) -> String;
}

/// Returns the tool result unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThroughComposer;

#[async_trait]
impl ResponseComposer for PassThroughComposer {
    async fn compose(&self, _query: &str, tool_result: &str) -> String {
        tool_result.to_string()
    }
}

/// Asks a hosted text-generation model to phrase the answer, falling back to
/// the plain tool result when the model fails or returns nothing.
pub struct HostedModelComposer {
    client: InferenceClient,
    parameters: GenerationParameters,
}

impl HostedModelComposer {
    pub fn new(client: InferenceClient) -> Self {
        Self {
            client,
            parameters: GenerationParameters::default(),
        }
    }

    pub fn prompt(query: &str, tool_result: &str) -> String {
        format!(
            "Human: {query}\nTool Information: {tool_result}\n\nPlease provide a helpful and natural response based on the tool information above.\nAssistant:"
        )
    }
}

#[async_trait]
impl ResponseComposer for HostedModelComposer {
    async fn compose(&self, query: &str, tool_result: &str) -> String {
        let prompt = Self::prompt(query, tool_result);
        match self.client.generate(&prompt, &self.parameters).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!("Hosted model returned no text, using tool result");
                PassThroughComposer.compose(query, tool_result).await
            }
            Err(e) => {
                warn!("HF API generation failed: {e}");
                PassThroughComposer.compose(query, tool_result).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use web::test_util::spawn_mock_server;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::time::Duration;

    fn composer(url: String) -> HostedModelComposer {
        HostedModelComposer::new(InferenceClient::with_base_url(
            "hf_test".into(),
            url,
            Duration::from_secs(5),
        ))
    }

    #[tokio::test]
    async fn test_pass_through() {
        let text = PassThroughComposer.compose("2+2", "Calculation: 2+2 = 4").await;
        assert_eq!(text, "Calculation: 2+2 = 4");
    }

    #[test]
    fn test_prompt_format() {
        assert_eq!(
            HostedModelComposer::prompt("hi", "result"),
            "Human: hi\nTool Information: result\n\nPlease provide a helpful and natural response based on the tool information above.\nAssistant:"
        );
    }

    #[tokio::test]
    async fn test_uses_generated_text() {
        let app = Router::new().route(
            "/model",
            post(|Json(body): Json<Value>| async move {
                assert!(body["inputs"]
                    .as_str()
                    .unwrap()
                    .contains("Tool Information: Calculation: 2+2 = 4"));
                Json(json!([{"generated_text": "Two plus two is 4."}]))
            }),
        );
        let base_url = spawn_mock_server(app).await;

        let text = composer(format!("{base_url}/model"))
            .compose("2+2", "Calculation: 2+2 = 4")
            .await;
        assert_eq!(text, "Two plus two is 4.");
    }

    #[tokio::test]
    async fn test_falls_back_on_failure() {
        let app = Router::new().route(
            "/model",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "loading") }),
        );
        let base_url = spawn_mock_server(app).await;

        let text = composer(format!("{base_url}/model"))
            .compose("2+2", "Calculation: 2+2 = 4")
            .await;
        assert_eq!(text, "Calculation: 2+2 = 4");
    }

    #[tokio::test]
    async fn test_falls_back_on_empty_generation() {
        let app = Router::new().route("/model", post(|| async { Json(json!([])) }));
        let base_url = spawn_mock_server(app).await;

        let text = composer(format!("{base_url}/model"))
            .compose("weather", "Current weather in Paris: Sunny")
            .await;
        assert_eq!(text, "Current weather in Paris: Sunny");
    }
}
