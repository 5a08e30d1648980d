//! OpenAI-compatible chat completion client.
//!
//! Talks to any endpoint speaking the `/chat/completions` protocol. Defaults
//! to DeepSeek. Only non-streaming, single-message requests are issued.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::traits::GenerativeProvider;
use super::{DEFAULT_HTTP_TIMEOUT, check_status, http_client, record_request};
use crate::{EldhrimnirError, Result};

/// Default base URL for the chat completion API.
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";

/// Default model name.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Client for a chat completion API.
#[derive(Clone)]
pub struct ChatCompletionClient {
    api_key: String,
    model: String,
    http: Client,
    base_url: String,
}

impl ChatCompletionClient {
    /// Create a client for the default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            http: http_client(DEFAULT_HTTP_TIMEOUT)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Use a different model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replace the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = http_client(timeout)?;
        Ok(self)
    }

    /// Send one user message and return the first choice's content.
    #[instrument(skip_all, fields(model = %self.model))]
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let result = self.send(prompt).await;
        record_request("chat", "complete", start, result.is_ok());
        result
    }

    async fn send(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                model: &self.model,
                messages: vec![ChatMessage {
                    role: "user",
                    content: prompt,
                }],
                stream: false,
            })
            .send()
            .await
            .map_err(|e| EldhrimnirError::Http(e.to_string()))?;

        let response = check_status(response).await?;

        let body = response
            .text()
            .await
            .map_err(|e| EldhrimnirError::Http(e.to_string()))?;
        let parsed: CompletionResponse = serde_json::from_str(&body)?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(EldhrimnirError::EmptyResponse)?;

        if content.trim().is_empty() {
            return Err(EldhrimnirError::EmptyResponse);
        }

        debug!(chars = content.len(), "completion received");
        Ok(content)
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl GenerativeProvider for ChatCompletionClient {
    fn name(&self) -> &str {
        "chat"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        ChatCompletionClient::complete(self, prompt).await
    }
}
