use log::debug;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::{ApiConfig, DEFAULT_MAX_TOKENS};
use crate::errors::{ChatError, ChatResult};
use crate::types::*;

/// Sampling temperature sent with every completion request
pub const TEMPERATURE: f32 = 0.7;

/// Client for an OpenAI-compatible chat completion API
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    config: ApiConfig,
    max_tokens: u32,
}

impl ChatClient {
    /// Create a new chat API client
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Overrides the token cap sent with completion requests
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Replaces the endpoint, key and model used by subsequent calls
    pub fn set_credentials(&mut self, config: ApiConfig) {
        self.config = config;
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Sends the full conversation and returns the provider's raw response
    pub async fn chat_completion(&self, messages: &[Message]) -> ChatResult<ChatResponse> {
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            max_tokens: Some(self.max_tokens),
            temperature: Some(TEMPERATURE),
        };
        let body = serde_json::to_vec(&request).map_err(ChatError::SerializationError)?;

        let url = self.endpoint("chat/completions");
        debug!(
            "POST {} ({} messages, model {})",
            url,
            messages.len(),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .body(body)
            .send()
            .await
            .map_err(ChatError::RequestError)?;

        read_json(response).await
    }

    /// Sends the conversation and returns the first choice's content
    pub async fn complete(&self, messages: &[Message]) -> ChatResult<String> {
        let response = self.chat_completion(messages).await?;
        extract_reply(response)
    }

    /// Fetches the provider's model catalog
    pub async fn list_models(&self) -> ChatResult<ModelsResponse> {
        let url = self.endpoint("models");
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .send()
            .await
            .map_err(ChatError::RequestError)?;

        read_json(response).await
    }
}

/// Takes the first choice of a response, failing on an empty choice list
pub fn extract_reply(response: ChatResponse) -> ChatResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or(ChatError::EmptyResponse)
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ChatResult<T> {
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        ChatError::ResponseError(format!("Failed to read response body: {}", e))
    })?;

    if status != StatusCode::OK {
        return Err(ChatError::HttpError {
            status_code: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|source| ChatError::ParsingError { source, body })
}
