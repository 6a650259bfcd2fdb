use log::debug;
use reqwest::{Client, StatusCode};

use crate::errors::{SearchError, SearchResult};
use crate::types::SearchResults;

/// Fixed search provider endpoint
pub const SEARCH_ENDPOINT: &str = "https://serpapi.com/search";

const RESULT_COUNT: &str = "10";

/// Performs web searches through the configured provider
#[derive(Debug, Clone)]
pub struct WebSearcher {
    client: Client,
    api_key: Option<String>,
    engine: String,
    endpoint: String,
}

impl WebSearcher {
    pub fn new(api_key: Option<String>, engine: impl Into<String>) -> Self {
        let engine = engine.into();
        Self {
            client: Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            engine: if engine.is_empty() {
                "google".to_string()
            } else {
                engine
            },
            endpoint: SEARCH_ENDPOINT.to_string(),
        }
    }

    /// Points the searcher at another endpoint (mock servers, proxies)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// Runs a single search; fails before any I/O when no key is configured
    pub async fn search(&self, query: &str) -> SearchResult<SearchResults> {
        let api_key = self.api_key.as_deref().ok_or(SearchError::MissingApiKey)?;

        debug!("Searching '{}' with engine {}", query, self.engine);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("api_key", api_key),
                ("engine", self.engine.as_str()),
                ("num", RESULT_COUNT),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(SearchError::Http {
                status_code: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
