use crate::constants::LLM_REQUEST_TIMEOUT_SECONDS;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A chat-completion backend. Failures are returned as errors for the caller
/// to catch; the enrichment pipeline maps them into stage-scoped fallbacks.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        force_json: bool,
    ) -> Result<String>;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints (OpenAI,
/// DashScope compatible mode, local gateways).
pub struct ChatCompletionsClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ChatCompletionsClient {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(LLM_REQUEST_TIMEOUT_SECONDS))
            .build()
            .unwrap_or_default();

        ChatCompletionsClient {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        force_json: bool,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": temperature,
        });
        if force_json {
            body["response_format"] = json!({"type": "json_object"});
        }

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            force_json,
            "LLM chat request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LlmApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = %status, "LLM API HTTP error: {}", error_text);
            return Err(AppError::LlmApi(format!("HTTP {}: {}", status, error_text)));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::LlmApi(format!("Failed to parse response: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::LlmApi("Response contained no choices".to_string()))?;

        Ok(content)
    }
}

// Chat-completions API response types

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
