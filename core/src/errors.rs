use thiserror::Error;

/// Chat API errors
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Request Error: failed to send request: {0}")]
    RequestError(#[source] reqwest::Error),

    #[error("Serialization Error: failed to encode request: {0}")]
    SerializationError(#[source] serde_json::Error),

    #[error("API Error (code: {status_code}) - {body}")]
    HttpError { status_code: u16, body: String },

    #[error("Parsing Error: {source} - {body}")]
    ParsingError {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("Empty Response: the provider returned no choices")]
    EmptyResponse,
}

impl ChatError {
    /// True when the provider reports it is temporarily overloaded.
    pub fn is_overloaded(&self) -> bool {
        if let ChatError::HttpError { status_code: 503, .. } = self {
            return true;
        }
        self.to_string().contains("engine_overloaded")
    }
}

/// Result type for chat operations
pub type ChatResult<T> = Result<T, ChatError>;
