//! Chat completion backend for OpenAI API compatible endpoints

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::backend::traits::ChatBackend;
use crate::config::ChatConfig;
use crate::error::{AppError, Result};

/// Role of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// Chat turn sent to the completion API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Chat completion request. Sampling parameters are left to the provider defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    /// Exactly one system turn followed by one user turn
    pub fn new(model: &str, system_prompt: &str, user_message: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_message),
            ],
        }
    }
}

/// Chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl ChatCompletionResponse {
    /// Text of the first choice
    pub fn into_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::Completion("Completion contained no text".to_string()))
    }
}

/// OpenAI API compatible completion client
pub struct OpenAIChatBackend {
    client: Client,
    url: String,
    model: String,
    api_key: String,
}

impl OpenAIChatBackend {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }

        headers
    }
}

#[async_trait]
impl ChatBackend for OpenAIChatBackend {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        let request = ChatCompletionRequest::new(&self.model, system_prompt, user_message);

        debug!(model = %self.model, "Sending chat completion request");

        let response = self
            .client
            .post(&self.url)
            .headers(self.get_headers())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(model = %self.model, error = %e, "Chat completion request failed");
                AppError::Completion(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Chat completion returned an error");
            return Err(AppError::Completion(format!(
                "Backend returned {}: {}",
                status, body
            )));
        }

        let result = response.json::<ChatCompletionResponse>().await.map_err(|e| {
            error!(model = %self.model, error = %e, "Failed to parse chat completion response");
            AppError::Completion(format!("Failed to parse response: {}", e))
        })?;

        if let Some(usage) = &result.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Chat completion usage"
            );
        }

        result.into_text()
    }
}
