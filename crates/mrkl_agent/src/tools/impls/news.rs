use super::search::{encyclopedia_search, SearchOutput};
use crate::config::AgentConfig;
use crate::tools::core::{Render, Tool, ToolResult, ToolSpec};
use crate::types::ToolId;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use web::{SerpApiClient, SerpResult, WikipediaClient};

const HEADLINE_COUNT: usize = 5;
const RELATED_COUNT: usize = 3;
const NEWS_WORDS: &[&str] = &["latest", "recent", "current", "news", "about", "on", "today"];

/// Why the news provider could not be used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NewsFallback {
    MissingKey,
    NoResults,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NewsOutput {
    Headlines { query: String, items: Vec<SerpResult> },
    /// Regular results returned instead of news items
    Related { query: String, results: Vec<SerpResult> },
    /// Encyclopedia lookup used when no news source is usable
    Background {
        query: String,
        fallback: NewsFallback,
        result: SearchOutput,
    },
}

fn render_headline(index: usize, item: &SerpResult) -> String {
    let mut text = format!(
        "{}. {}",
        index,
        item.title.as_deref().unwrap_or("No title")
    );
    if let Some(date) = item.date.as_deref().filter(|d| !d.is_empty()) {
        text.push_str(&format!(" ({date})"));
    }
    text.push_str(&format!(
        "\n   Source: {}",
        item.source.as_deref().unwrap_or("Unknown source")
    ));
    if let Some(snippet) = item.snippet.as_deref().filter(|s| !s.is_empty()) {
        text.push_str(&format!("\n   {snippet}"));
    }
    if let Some(link) = item.link.as_deref().filter(|l| !l.is_empty()) {
        text.push_str(&format!("\n   Link: {link}"));
    }
    text
}

impl NewsFallback {
    fn notice(&self, query: &str) -> String {
        match self {
            NewsFallback::MissingKey => {
                "News search requires API key. Using general search instead.".to_string()
            }
            NewsFallback::NoResults => format!(
                "Could not retrieve news for '{query}' at this time. Using general search instead."
            ),
            NewsFallback::Failed { error } => format!(
                "News search error for '{query}': {error}. Using general search instead."
            ),
        }
    }
}

impl Render for NewsOutput {
    fn status(&self) -> String {
        match self {
            NewsOutput::Headlines { items, .. } => format!("{} headlines", items.len()),
            NewsOutput::Related { results, .. } => format!("{} related results", results.len()),
            NewsOutput::Background { result, .. } => {
                format!("No news source available; {}", result.status())
            }
        }
    }

    fn render(&self) -> String {
        match self {
            NewsOutput::Headlines { query, items } => {
                let blocks: Vec<String> = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| render_headline(i + 1, item))
                    .collect();
                format!("Latest news for '{query}':\n\n{}", blocks.join("\n\n"))
            }
            NewsOutput::Related { query, results } => {
                let blocks: Vec<String> = results
                    .iter()
                    .enumerate()
                    .map(|(i, r)| {
                        format!(
                            "{}. {}\n   {}\n   Source: {}",
                            i + 1,
                            r.title.as_deref().unwrap_or("No title"),
                            r.snippet.as_deref().unwrap_or_default(),
                            r.link.as_deref().unwrap_or_default()
                        )
                    })
                    .collect();
                format!(
                    "Recent information about '{query}':\n\n{}",
                    blocks.join("\n\n")
                )
            }
            NewsOutput::Background {
                query,
                fallback,
                result,
            } => format!("{}\n\n{}", fallback.notice(query), result.render()),
        }
    }
}

impl ToolResult for NewsOutput {
    fn is_success(&self) -> bool {
        match self {
            NewsOutput::Headlines { .. } | NewsOutput::Related { .. } => true,
            NewsOutput::Background { result, .. } => result.is_success(),
        }
    }
}

/// News through SerpAPI, falling back to the encyclopedia when there is no
/// key, no result or a provider error.
pub struct NewsTool {
    serp: SerpApiClient,
    wikipedia: WikipediaClient,
}

impl NewsTool {
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

    async fn background(&self, query: String, fallback: NewsFallback) -> NewsOutput {
        let topic = news_topic(&query);
        info!("Using encyclopedia for news topic {topic:?} ({fallback:?})");
        let result = encyclopedia_search(&self.wikipedia, &topic).await;
        NewsOutput::Background {
            query,
            fallback,
            result,
        }
    }
}

/// Makes sure the provider sees a news-flavoured query.
fn news_query(input: &str) -> String {
    let lower = input.to_lowercase();
    if lower.contains("news") || lower.contains("latest") {
        input.to_string()
    } else {
        format!("latest news {input}")
    }
}

/// Strips the news vocabulary so the encyclopedia sees just the topic.
fn news_topic(query: &str) -> String {
    let words: Vec<&str> = query
        .split_whitespace()
        .filter(|w| !NEWS_WORDS.contains(&w.to_lowercase().as_str()))
        .collect();
    if words.is_empty() {
        query.to_string()
    } else {
        words.join(" ")
    }
}

#[async_trait::async_trait]
impl Tool for NewsTool {
    type Output = NewsOutput;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            id: ToolId::News,
            name: "news",
            description: "Get latest news and current events about any topic. Input should be a news topic like 'latest AI news' or 'current events in technology'",
        }
    }

    async fn execute(&self, input: &str) -> Result<Self::Output> {
        let query = news_query(input);
        if !self.serp.has_api_key() {
            return Ok(self.background(query, NewsFallback::MissingKey).await);
        }

        Ok(match self.serp.news(&query, HEADLINE_COUNT as u32).await {
            Ok(response) if !response.news_results.is_empty() => NewsOutput::Headlines {
                query,
                items: response.news_results.into_iter().take(HEADLINE_COUNT).collect(),
            },
            Ok(response) if !response.organic_results.is_empty() => NewsOutput::Related {
                query,
                results: response
                    .organic_results
                    .into_iter()
                    .take(RELATED_COUNT)
                    .collect(),
            },
            Ok(_) => self.background(query, NewsFallback::NoResults).await,
            Err(e) if e.is_status() => {
                warn!("News provider rejected request: {e}");
                self.background(query, NewsFallback::NoResults).await
            }
            Err(e) => {
                warn!("News search failed: {e}");
                let fallback = NewsFallback::Failed {
                    error: e.to_string(),
                };
                self.background(query, fallback).await
            }
        })
    }
}
