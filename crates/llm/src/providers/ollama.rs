//! Ollama LLM provider implementation.
//!
//! Uses the `/api/chat` endpoint with streaming disabled. Structured
//! completions pass the JSON schema through the `format` field.
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::client::{ChatRequest, ChatResponse, LlmClient, LlmUsage};
use crate::types::{ChatMessage, ResponseSchema};
use promptsy_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    model: String,
    message: OllamaMessage,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

/// Ollama LLM client.
pub struct OllamaClient {
    /// Base URL for Ollama API
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a new Ollama client with default settings.
    ///
    /// Default URL: http://localhost:11434
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_OLLAMA_URL)
    }

    /// Create a new Ollama client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn to_ollama_request<'a>(
        &self,
        request: &'a ChatRequest,
        format: Option<&'a serde_json::Value>,
    ) -> OllamaRequest<'a> {
        let options = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            })
        } else {
            None
        };

        OllamaRequest {
            model: &request.model,
            messages: &request.messages,
            format,
            options,
            stream: false,
        }
    }

    async fn send(&self, body: &OllamaRequest<'_>) -> AppResult<ChatResponse> {
        let url = format!("{}/api/chat", self.base_url);
        tracing::debug!("POST {} (model {})", url, body.model);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                AppError::LlmUnavailable(format!("Failed to send request to Ollama: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::LlmUnavailable(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let ollama_response: OllamaResponse = response.json().await.map_err(|e| {
            AppError::LlmUnavailable(format!("Failed to parse Ollama response: {}", e))
        })?;

        Ok(ChatResponse {
            content: ollama_response.message.content,
            model: ollama_response.model,
            usage: LlmUsage::new(
                ollama_response.prompt_eval_count.unwrap_or(0),
                ollama_response.eval_count.unwrap_or(0),
            ),
        })
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn complete_chat(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        tracing::info!("Sending chat completion to Ollama");

        let body = self.to_ollama_request(request, None);
        let response = self.send(&body).await?;

        tracing::info!("Received completion from Ollama");
        Ok(response)
    }

    async fn complete_chat_structured(
        &self,
        request: &ChatRequest,
        schema: &ResponseSchema,
    ) -> AppResult<serde_json::Value> {
        tracing::info!("Sending structured completion to Ollama (schema {})", schema.name);

        let body = self.to_ollama_request(request, Some(&schema.schema));
        let response = self.send(&body).await?;

        serde_json::from_str(&response.content).map_err(|e| {
            AppError::LlmUnavailable(format!("Structured response is not valid JSON: {}", e))
        })
    }
}
