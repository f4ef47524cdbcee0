use crate::error::{ServiceError, ServiceResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Lead section of an encyclopedia article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiPage {
    pub title: String,
    pub extract: String,
    pub url: String,
    pub disambiguation: bool,
}

#[derive(Deserialize)]
struct QueryEnvelope<T> {
    query: Option<T>,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: Vec<RawPage>,
}

#[derive(Deserialize)]
struct RawPage {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    fullurl: Option<String>,
    #[serde(default)]
    pageprops: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    links: Vec<RawLink>,
}

#[derive(Deserialize)]
struct RawLink {
    title: String,
}

/// Minimal MediaWiki action API client (search, intro extract, page links).
pub struct WikipediaClient {
    http_client: Client,
    api_url: String,
    timeout: Duration,
}

impl WikipediaClient {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(DEFAULT_WIKIPEDIA_API_URL.to_string(), timeout)
    }

    pub fn with_base_url(api_url: String, timeout: Duration) -> Self {
        Self {
            http_client: Client::new(),
            api_url,
            timeout,
        }
    }

    /// Titles of the best matching articles, best first.
    pub async fn search(&self, query: &str, limit: u32) -> ServiceResult<Vec<String>> {
        let limit = limit.to_string();
        let envelope: QueryEnvelope<SearchQuery> = self
            .get(&[
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
            ])
            .await?;

        Ok(envelope
            .query
            .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
            .unwrap_or_default())
    }

    /// Plain-text intro (first three sentences) of `title`, following
    /// redirects. `None` when the article does not exist.
    pub async fn page(&self, title: &str) -> ServiceResult<Option<WikiPage>> {
        let envelope: QueryEnvelope<PagesQuery> = self
            .get(&[
                ("prop", "extracts|info|pageprops"),
                ("titles", title),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("exsentences", "3"),
                ("inprop", "url"),
                ("redirects", "1"),
            ])
            .await?;

        let Some(page) = envelope.query.and_then(|q| q.pages.into_iter().next()) else {
            return Ok(None);
        };
        if page.missing {
            return Ok(None);
        }

        let disambiguation = page
            .pageprops
            .as_ref()
            .is_some_and(|props| props.contains_key("disambiguation"));

        Ok(Some(WikiPage {
            url: page.fullurl.unwrap_or_default(),
            extract: page.extract.unwrap_or_default().trim().to_string(),
            title: page.title,
            disambiguation,
        }))
    }

    /// Article links on `title`; used to list the options of a
    /// disambiguation page.
    pub async fn links(&self, title: &str, limit: u32) -> ServiceResult<Vec<String>> {
        let limit = limit.to_string();
        let envelope: QueryEnvelope<PagesQuery> = self
            .get(&[
                ("prop", "links"),
                ("titles", title),
                ("plnamespace", "0"),
                ("pllimit", limit.as_str()),
                ("redirects", "1"),
            ])
            .await?;

        Ok(envelope
            .query
            .and_then(|q| q.pages.into_iter().next())
            .map(|page| page.links.into_iter().map(|link| link.title).collect())
            .unwrap_or_default())
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, params: &[(&str, &str)]) -> ServiceResult<T> {
        debug!("Wikipedia request {params:?}");
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::spawn_mock_server;
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    async fn mock_api() -> String {
        let app = Router::new().route(
            "/w/api.php",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("action").map(String::as_str), Some("query"));
                let body: Value = match params.get("list").map(String::as_str) {
                    Some("search") => json!({
                        "query": {"search": [{"title": "Quantum computing"}, {"title": "Qubit"}]}
                    }),
                    _ if params.get("prop").map(String::as_str) == Some("links") => json!({
                        "query": {"pages": [{
                            "title": "Mercury",
                            "links": [{"ns": 0, "title": "Mercury (planet)"}, {"ns": 0, "title": "Mercury (element)"}]
                        }]}
                    }),
                    _ => match params.get("titles").map(String::as_str) {
                        Some("Mercury") => json!({
                            "query": {"pages": [{
                                "title": "Mercury",
                                "extract": "Mercury may refer to:",
                                "fullurl": "https://en.wikipedia.org/wiki/Mercury",
                                "pageprops": {"disambiguation": ""}
                            }]}
                        }),
                        Some("Nowhere") => json!({
                            "query": {"pages": [{"title": "Nowhere", "missing": true}]}
                        }),
                        _ => json!({
                            "query": {"pages": [{
                                "title": "Quantum computing",
                                "extract": "A quantum computer exploits quantum mechanics. \n",
                                "fullurl": "https://en.wikipedia.org/wiki/Quantum_computing"
                            }]}
                        }),
                    },
                };
                Json(body)
            }),
        );
        let base_url = spawn_mock_server(app).await;
        format!("{base_url}/w/api.php")
    }

    fn client(api_url: String) -> WikipediaClient {
        WikipediaClient::with_base_url(api_url, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_search_titles() {
        let client = client(mock_api().await);
        let titles = client.search("quantum computing", 3).await.unwrap();
        assert_eq!(titles, vec!["Quantum computing", "Qubit"]);
    }

    #[tokio::test]
    async fn test_page_extract() {
        let client = client(mock_api().await);
        let page = client.page("Quantum computing").await.unwrap().unwrap();
        assert_eq!(page.title, "Quantum computing");
        assert_eq!(page.extract, "A quantum computer exploits quantum mechanics.");
        assert_eq!(page.url, "https://en.wikipedia.org/wiki/Quantum_computing");
        assert!(!page.disambiguation);
    }

    #[tokio::test]
    async fn test_disambiguation_page_and_links() {
        let client = client(mock_api().await);
        let page = client.page("Mercury").await.unwrap().unwrap();
        assert!(page.disambiguation);

        let options = client.links("Mercury", 10).await.unwrap();
        assert_eq!(options, vec!["Mercury (planet)", "Mercury (element)"]);
    }

    #[tokio::test]
    async fn test_missing_page() {
        let client = client(mock_api().await);
        assert!(client.page("Nowhere").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_response_without_query_section() {
        let app = Router::new().route(
            "/w/api.php",
            get(|| async { Json(json!({"batchcomplete": true})) }),
        );
        let client = client(format!("{}/w/api.php", spawn_mock_server(app).await));

        assert!(client.search("anything", 3).await.unwrap().is_empty());
        assert!(client.page("Anything").await.unwrap().is_none());
        assert!(client.links("Anything", 10).await.unwrap().is_empty());
    }
}
