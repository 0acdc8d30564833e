//! Tavily news search client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RiskError;
use crate::types::NewsSnippet;

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";
const SERVICE: &str = "news search";
const UNKNOWN_DATE: &str = "unknown date";

/// Lookback window, in days, for news results.
pub const LOOKBACK_DAYS: u32 = 30;
/// Maximum number of news results per query.
pub const MAX_RESULTS: u32 = 5;

/// Source of recent news for a query.
#[async_trait]
pub trait NewsSearch: Send + Sync {
    /// Return recent news snippets for `query`, newest context first as the
    /// provider orders them.
    async fn search(&self, query: &str) -> Result<Vec<NewsSnippet>, RiskError>;
}

/// HTTP client for the Tavily search API.
pub struct TavilyClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    topic: &'static str,
    days: u32,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    published_date: Option<String>,
    content: Option<String>,
}

impl TavilyClient {
    /// Creates a client pointed at the production Tavily API.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Upstream`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, RiskError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Upstream`] if the HTTP client cannot be built.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, RiskError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("supplyalert/0.1 (route-risk)")
            .build()
            .map_err(|e| RiskError::upstream(SERVICE, format!("client build failed: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            url: format!("{}/search", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl NewsSearch for TavilyClient {
    async fn search(&self, query: &str) -> Result<Vec<NewsSnippet>, RiskError> {
        let request = SearchRequest {
            api_key: &self.api_key,
            query,
            topic: "news",
            days: LOOKBACK_DAYS,
            max_results: MAX_RESULTS,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RiskError::upstream(SERVICE, format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(RiskError::upstream(
                SERVICE,
                format!("returned status {}", response.status()),
            ));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| RiskError::upstream(SERVICE, format!("response parse error: {e}")))?;

        let snippets = body
            .results
            .into_iter()
            .filter_map(|result| {
                let content = result.content?;
                if content.trim().is_empty() {
                    return None;
                }
                Some(NewsSnippet {
                    published_date: result
                        .published_date
                        .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
                    content: content.trim().to_string(),
                })
            })
            .take(MAX_RESULTS as usize)
            .collect();

        Ok(snippets)
    }
}
