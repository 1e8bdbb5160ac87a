//! Optional live web-search augmentation via Tavily.
//!
//! Only recency-sensitive questions trigger a search, and any failure
//! degrades to "no augmentation" so the answer path is never blocked.

use crate::config::Settings;
use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, instrument, warn};

const SEARCH_URL: &str = "https://api.tavily.com/search";

/// Keywords that indicate current/recent information is needed.
const RECENCY_KEYWORDS: &[&str] = &[
    "latest",
    "recent",
    "current",
    "now",
    "today",
    "this week",
    "this month",
    "news",
    "update",
    "new",
    "upcoming",
    "what's happening",
    "trending",
    "just released",
    "breaking",
];

fn year_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b20\d{2}\b").expect("Invalid regex"))
}

/// Whether a query warrants a live web search.
pub fn should_search_web(query: &str) -> bool {
    let lower = query.to_lowercase();
    RECENCY_KEYWORDS.iter().any(|kw| lower.contains(kw)) || year_token_regex().is_match(&lower)
}

/// One ranked result summary from the search API.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    include_answer: bool,
    search_depth: &'a str,
}

/// Tavily search client. Construct with `from_settings`; an absent API key
/// yields `None` and the feature is silently disabled.
pub struct WebSearchClient {
    http: reqwest::Client,
    api_key: String,
    max_results: usize,
}

impl WebSearchClient {
    /// Create a client if a Tavily API key is configured.
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        let api_key = settings.tavily_api_key()?;
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Some(Self {
            http,
            api_key,
            max_results: settings.websearch.max_results,
        })
    }

    /// Search the web, returning ranked result summaries.
    ///
    /// Never propagates upstream failures: errors and empty result sets
    /// both come back as an empty vec, logged at `warn`.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        match self.try_search(query).await {
            Ok(results) => {
                debug!("Web search returned {} results", results.len());
                results
            }
            Err(e) => {
                warn!("Web search failed, continuing without augmentation: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let request = SearchRequest {
            api_key: &self.api_key,
            query,
            max_results: self.max_results,
            include_answer: true,
            search_depth: "basic",
        };

        let response = self
            .http
            .post(SEARCH_URL)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let data: SearchResponse = response.json().await?;
        Ok(data.results)
    }
}

/// Format the top search results as a labeled prompt block.
///
/// Returns an empty string for no results, so the block can be appended
/// unconditionally.
pub fn format_web_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return String::new();
    }

    let summaries: Vec<String> = results
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, r)| format!("[{}] {}: {}", i + 1, r.title, r.content))
        .collect();

    format!("\n\nCurrent web information:\n{}", summaries.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recency_queries_trigger_search() {
        assert!(should_search_web("what's the latest news"));
        assert!(should_search_web("anything NEW this week?"));
        assert!(should_search_web("what happened in 2025"));
        assert!(should_search_web("current thoughts on markets"));
    }

    #[test]
    fn test_evergreen_queries_do_not_trigger_search() {
        assert!(!should_search_web("what do you think about discipline"));
        assert!(!should_search_web("how should I learn physics"));
        assert!(!should_search_web(""));
    }

    #[test]
    fn test_format_web_results() {
        let results = vec![
            SearchResult {
                title: "First".to_string(),
                content: "alpha".to_string(),
            },
            SearchResult {
                title: "Second".to_string(),
                content: "beta".to_string(),
            },
        ];
        let block = format_web_results(&results);
        assert!(block.starts_with("\n\nCurrent web information:"));
        assert!(block.contains("[1] First: alpha"));
        assert!(block.contains("[2] Second: beta"));
    }

    #[test]
    fn test_format_web_results_empty() {
        assert_eq!(format_web_results(&[]), "");
    }

    #[test]
    fn test_format_web_results_caps_at_three() {
        let results: Vec<SearchResult> = (0..5)
            .map(|i| SearchResult {
                title: format!("t{}", i),
                content: "c".to_string(),
            })
            .collect();
        let block = format_web_results(&results);
        assert!(block.contains("[3] t2"));
        assert!(!block.contains("t3"));
    }

    #[test]
    fn test_disabled_without_api_key() {
        let settings = Settings::default();
        if settings.tavily_api_key().is_none() {
            assert!(WebSearchClient::from_settings(&settings).is_none());
        }
    }
}
