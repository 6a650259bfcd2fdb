use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search API key is not configured (set SEARCH_API_KEY)")]
    MissingApiKey,

    #[error("Search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Search error (code: {status_code}) - {body}")]
    Http { status_code: u16, body: String },

    #[error("Failed to parse search response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SearchError {
    /// Configuration problems the user can fix, as opposed to provider failures
    pub fn is_config(&self) -> bool {
        matches!(self, SearchError::MissingApiKey)
    }
}

pub type SearchResult<T> = Result<T, SearchError>;
