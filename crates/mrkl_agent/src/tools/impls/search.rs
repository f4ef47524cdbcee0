use crate::config::AgentConfig;
use crate::tools::core::{Render, Tool, ToolResult, ToolSpec};
use crate::types::ToolId;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use web::{SerpApiClient, SerpResult, WikipediaClient};

const WEB_RESULT_COUNT: usize = 3;
const QUERY_FILLER_WORDS: &[&str] = &["tell", "me", "about", "explain", "define"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebHit {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

impl From<SerpResult> for WebHit {
    fn from(result: SerpResult) -> Self {
        Self {
            title: result.title.unwrap_or_else(|| "No title".to_string()),
            snippet: result
                .snippet
                .unwrap_or_else(|| "No description available".to_string()),
            link: result.link.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchOutput {
    Web {
        query: String,
        hits: Vec<WebHit>,
    },
    Encyclopedia {
        query: String,
        /// Set when the article was reached through a disambiguation page
        chosen_option: Option<String>,
        summary: String,
        url: String,
    },
    Ambiguous {
        query: String,
        options: Vec<String>,
    },
    NotFound {
        query: String,
    },
    NoDetails {
        query: String,
    },
    Failed {
        query: String,
        error: String,
    },
}

impl Render for SearchOutput {
    fn status(&self) -> String {
        match self {
            SearchOutput::Web { hits, .. } => format!("{} web results", hits.len()),
            SearchOutput::Encyclopedia { .. } => "Encyclopedia article found".to_string(),
            SearchOutput::Ambiguous { options, .. } => {
                format!("Ambiguous topic ({} options)", options.len())
            }
            SearchOutput::NotFound { .. } | SearchOutput::NoDetails { .. } => {
                "Nothing found".to_string()
            }
            SearchOutput::Failed { error, .. } => format!("Search failed: {error}"),
        }
    }

    fn render(&self) -> String {
        match self {
            SearchOutput::Web { query, hits } => {
                let blocks: Vec<String> = hits
                    .iter()
                    .enumerate()
                    .map(|(i, hit)| {
                        format!(
                            "{}. {}\n   {}\n   Source: {}",
                            i + 1,
                            hit.title,
                            hit.snippet,
                            hit.link
                        )
                    })
                    .collect();
                format!(
                    "Real-time search results for '{query}':\n\n{}",
                    blocks.join("\n\n")
                )
            }
            SearchOutput::Encyclopedia {
                query,
                chosen_option,
                summary,
                url,
            } => match chosen_option {
                Some(option) => format!(
                    "Wikipedia information about '{query}' ({option}):\n\n{summary}\n\nSource: {url}"
                ),
                None => {
                    format!("Wikipedia information about '{query}':\n\n{summary}\n\nSource: {url}")
                }
            },
            SearchOutput::Ambiguous { query, options } => format!(
                "Multiple articles found for '{query}'. Please be more specific. Options: {}",
                options.join(", ")
            ),
            SearchOutput::NotFound { query } => {
                format!("No information found for '{query}'. Try a different search term.")
            }
            SearchOutput::NoDetails { query } => {
                format!("Could not find detailed information about '{query}'.")
            }
            SearchOutput::Failed { query, error } => {
                format!("Search error for '{query}': {error}")
            }
        }
    }
}

impl ToolResult for SearchOutput {
    fn is_success(&self) -> bool {
        matches!(
            self,
            SearchOutput::Web { .. } | SearchOutput::Encyclopedia { .. }
        )
    }
}

/// Web search through SerpAPI when a key is configured, with the
/// encyclopedia as fallback.
pub struct SearchTool {
    serp: SerpApiClient,
    wikipedia: WikipediaClient,
}

impl SearchTool {
    pub fn new(serp: SerpApiClient, wikipedia: WikipediaClient) -> Self {
        Self { serp, wikipedia }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(
            SerpApiClient::with_base_url(
                config.serpapi_key.clone(),
                config.endpoints.serpapi_url.clone(),
                config.search_timeout,
            ),
            WikipediaClient::with_base_url(
                config.endpoints.wikipedia_api_url.clone(),
                config.search_timeout,
            ),
        )
    }

    async fn web_search(&self, query: &str) -> Option<SearchOutput> {
        match self.serp.search(query, WEB_RESULT_COUNT as u32).await {
            Ok(response) if !response.organic_results.is_empty() => Some(SearchOutput::Web {
                query: query.to_string(),
                hits: response
                    .organic_results
                    .into_iter()
                    .take(WEB_RESULT_COUNT)
                    .map(WebHit::from)
                    .collect(),
            }),
            Ok(_) => {
                debug!("SerpAPI returned no organic results for {query:?}");
                None
            }
            Err(e) => {
                warn!("SerpAPI search failed: {e}");
                None
            }
        }
    }
}

/// Looks the query up in the encyclopedia, following a disambiguation page
/// to its first option.
pub(crate) async fn encyclopedia_search(wikipedia: &WikipediaClient, query: &str) -> SearchOutput {
    let cleaned = clean_search_query(query);
    let failed = |e: web::ServiceError| SearchOutput::Failed {
        query: query.to_string(),
        error: e.to_string(),
    };

    let titles = match wikipedia.search(&cleaned, 3).await {
        Ok(titles) => titles,
        Err(e) => return failed(e),
    };
    let Some(first) = titles.first() else {
        return SearchOutput::NotFound {
            query: query.to_string(),
        };
    };

    match wikipedia.page(first).await {
        Ok(Some(page)) if !page.disambiguation => SearchOutput::Encyclopedia {
            query: query.to_string(),
            chosen_option: None,
            summary: page.extract,
            url: page.url,
        },
        Ok(Some(page)) => resolve_disambiguation(wikipedia, query, &page.title).await,
        Ok(None) => SearchOutput::NoDetails {
            query: query.to_string(),
        },
        Err(e) => failed(e),
    }
}

async fn resolve_disambiguation(
    wikipedia: &WikipediaClient,
    query: &str,
    title: &str,
) -> SearchOutput {
    let options = wikipedia.links(title, 10).await.unwrap_or_else(|e| {
        warn!("Could not list options for {title}: {e}");
        Vec::new()
    });

    if let Some(option) = options.first() {
        if let Ok(Some(page)) = wikipedia.page(option).await {
            if !page.disambiguation {
                return SearchOutput::Encyclopedia {
                    query: query.to_string(),
                    chosen_option: Some(option.clone()),
                    summary: page.extract,
                    url: page.url,
                };
            }
        }
    }

    SearchOutput::Ambiguous {
        query: query.to_string(),
        options: options.into_iter().take(5).collect(),
    }
}

/// Drops conversational filler; keeps the query if nothing else remains.
fn clean_search_query(query: &str) -> String {
    let words: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .filter(|w| !QUERY_FILLER_WORDS.contains(w))
        .map(str::to_string)
        .collect();
    if words.is_empty() {
        query.to_string()
    } else {
        words.join(" ")
    }
}

#[async_trait::async_trait]
impl Tool for SearchTool {
    type Output = SearchOutput;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            id: ToolId::Search,
            name: "search",
            description: "Search for real-time information about any topic using web search and Wikipedia. Input should be a topic or question like 'latest news about AI' or 'what is Python'",
        }
    }

    async fn execute(&self, input: &str) -> Result<Self::Output> {
        if self.serp.has_api_key() {
            if let Some(output) = self.web_search(input).await {
                return Ok(output);
            }
        }
        info!("Using encyclopedia search for {input:?}");
        Ok(encyclopedia_search(&self.wikipedia, input).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use web::test_util::spawn_mock_server;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::time::Duration;

    fn wiki_body(params: &HashMap<String, String>) -> Value {
        if params.get("list").map(String::as_str) == Some("search") {
            return match params.get("srsearch").map(String::as_str) {
                Some("zzyzx unknown") => json!({"query": {"search": []}}),
                Some("mercury") => json!({"query": {"search": [{"title": "Mercury"}]}}),
                _ => json!({"query": {"search": [{"title": "Quantum computing"}]}}),
            };
        }
        if params.get("prop").map(String::as_str) == Some("links") {
            return json!({"query": {"pages": [{"title": "Mercury", "links": [
                {"ns": 0, "title": "Mercury (planet)"},
                {"ns": 0, "title": "Mercury (element)"}
            ]}]}});
        }
        match params.get("titles").map(String::as_str) {
            Some("Mercury") => json!({"query": {"pages": [{
                "title": "Mercury", "extract": "Mercury may refer to:",
                "fullurl": "https://en.wikipedia.org/wiki/Mercury",
                "pageprops": {"disambiguation": ""}
            }]}}),
            Some("Mercury (planet)") => json!({"query": {"pages": [{
                "title": "Mercury (planet)", "extract": "Mercury is the first planet from the Sun.",
                "fullurl": "https://en.wikipedia.org/wiki/Mercury_(planet)"
            }]}}),
            _ => json!({"query": {"pages": [{
                "title": "Quantum computing",
                "extract": "A quantum computer is a computer that exploits quantum mechanical phenomena.",
                "fullurl": "https://en.wikipedia.org/wiki/Quantum_computing"
            }]}}),
        }
    }

    async fn mock_services(serp_status: StatusCode) -> String {
        let app = Router::new()
            .route(
                "/w/api.php",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    Json(wiki_body(&params))
                }),
            )
            .route(
                "/search",
                get(move || async move {
                    (
                        serp_status,
                        Json(json!({
                            "organic_results": [
                                {"title": "Quantum computing - Wikipedia", "snippet": "Quantum computing is...", "link": "https://example.org/qc"},
                                {"title": "IBM Quantum", "link": "https://example.org/ibm"},
                                {"title": "Third"},
                                {"title": "Fourth"}
                            ]
                        })),
                    )
                }),
            );
        spawn_mock_server(app).await
    }

    fn tool(base_url: &str, serp_key: Option<&str>) -> SearchTool {
        SearchTool::new(
            SerpApiClient::with_base_url(
                serp_key.map(str::to_string),
                base_url.to_string(),
                Duration::from_secs(5),
            ),
            WikipediaClient::with_base_url(format!("{base_url}/w/api.php"), Duration::from_secs(5)),
        )
    }

    #[tokio::test]
    async fn test_web_results_with_key() {
        let base_url = mock_services(StatusCode::OK).await;
        let output = tool(&base_url, Some("key")).execute("quantum computing").await.unwrap();

        assert!(output.is_success());
        let text = output.render();
        assert!(text.starts_with("Real-time search results for 'quantum computing':\n\n"));
        assert!(text.contains("1. Quantum computing - Wikipedia\n   Quantum computing is...\n   Source: https://example.org/qc"));
        assert!(text.contains("2. IBM Quantum\n   No description available\n   Source: https://example.org/ibm"));
        assert!(text.contains("3. Third"));
        assert!(!text.contains("Fourth"));
    }

    #[tokio::test]
    async fn test_falls_back_to_encyclopedia_on_provider_error() {
        let base_url = mock_services(StatusCode::UNAUTHORIZED).await;
        let output = tool(&base_url, Some("bad-key"))
            .execute("quantum computing?")
            .await
            .unwrap();

        assert_eq!(
            output.render(),
            "Wikipedia information about 'quantum computing?':\n\nA quantum computer is a computer that exploits quantum mechanical phenomena.\n\nSource: https://en.wikipedia.org/wiki/Quantum_computing"
        );
    }

    #[tokio::test]
    async fn test_encyclopedia_without_key() {
        let base_url = mock_services(StatusCode::OK).await;
        let output = tool(&base_url, None).execute("quantum computing").await.unwrap();
        assert!(matches!(output, SearchOutput::Encyclopedia { chosen_option: None, .. }));
    }

    #[tokio::test]
    async fn test_disambiguation_uses_first_option() {
        let base_url = mock_services(StatusCode::OK).await;
        let output = tool(&base_url, None).execute("mercury").await.unwrap();
        assert_eq!(
            output.render(),
            "Wikipedia information about 'mercury' (Mercury (planet)):\n\nMercury is the first planet from the Sun.\n\nSource: https://en.wikipedia.org/wiki/Mercury_(planet)"
        );
    }

    #[tokio::test]
    async fn test_no_hits() {
        let base_url = mock_services(StatusCode::OK).await;
        let output = tool(&base_url, None).execute("zzyzx unknown").await.unwrap();
        assert!(!output.is_success());
        assert_eq!(
            output.render(),
            "No information found for 'zzyzx unknown'. Try a different search term."
        );
    }

    #[tokio::test]
    async fn test_encyclopedia_unreachable() {
        let output = tool("http://127.0.0.1:9", None).execute("rust").await.unwrap();
        assert!(output.render().starts_with("Search error for 'rust': "));
    }

    #[test]
    fn test_clean_search_query() {
        assert_eq!(clean_search_query("Tell me about Rust"), "rust");
        assert_eq!(clean_search_query("explain define"), "explain define");
    }

    #[test]
    fn test_ambiguous_rendering() {
        let output = SearchOutput::Ambiguous {
            query: "java".into(),
            options: vec!["Java (island)".into(), "Java (language)".into()],
        };
        assert_eq!(
            output.render(),
            "Multiple articles found for 'java'. Please be more specific. Options: Java (island), Java (language)"
        );
    }
}
