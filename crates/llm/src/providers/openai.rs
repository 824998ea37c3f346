//! OpenAI-compatible chat completions provider.
//!
//! Works against api.openai.com and any server exposing the same
//! `/chat/completions` surface. Structured completions use
//! `response_format: {type: "json_schema"}`.

use crate::client::{ChatRequest, ChatResponse, LlmClient, LlmUsage};
use crate::types::{ChatMessage, ResponseSchema};
use promptsy_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// OpenAI API request format.
#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: &'a ResponseSchema,
}

/// OpenAI API response format.
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    model: String,
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// OpenAI LLM client.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client for the public OpenAI endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_OPENAI_URL, api_key)
    }

    /// Create a client for a custom OpenAI-compatible endpoint.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn to_openai_request<'a>(
        &self,
        request: &'a ChatRequest,
        schema: Option<&'a ResponseSchema>,
    ) -> OpenAiRequest<'a> {
        OpenAiRequest {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: schema.map(|json_schema| ResponseFormat {
                kind: "json_schema",
                json_schema,
            }),
            stream: false,
        }
    }

    async fn send(&self, body: &OpenAiRequest<'_>) -> AppResult<OpenAiResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!("POST {} (model {})", url, body.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::LlmUnavailable(format!("Failed to reach OpenAI: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::LlmUnavailable(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::LlmUnavailable(format!("Failed to parse OpenAI response: {}", e)))
    }

    /// Pull the first choice's text out of a response.
    fn first_content(response: OpenAiResponse) -> AppResult<(String, String, LlmUsage)> {
        let usage = response
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let message = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| AppError::LlmUnavailable("OpenAI returned no choices".to_string()))?;

        if let Some(refusal) = message.refusal {
            return Err(AppError::LlmUnavailable(format!(
                "Model refused the request: {}",
                refusal
            )));
        }

        let content = message
            .content
            .ok_or_else(|| AppError::LlmUnavailable("OpenAI returned empty content".to_string()))?;

        Ok((content, response.model, usage))
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete_chat(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        tracing::info!("Sending chat completion to OpenAI");

        let body = self.to_openai_request(request, None);
        let (content, model, usage) = Self::first_content(self.send(&body).await?)?;

        tracing::debug!(
            "OpenAI usage - prompt: {}, completion: {}",
            usage.prompt_tokens,
            usage.completion_tokens
        );

        Ok(ChatResponse {
            content,
            model,
            usage,
        })
    }

    async fn complete_chat_structured(
        &self,
        request: &ChatRequest,
        schema: &ResponseSchema,
    ) -> AppResult<serde_json::Value> {
        tracing::info!("Sending structured completion to OpenAI (schema {})", schema.name);

        let body = self.to_openai_request(request, Some(schema));
        let (content, _, _) = Self::first_content(self.send(&body).await?)?;

        serde_json::from_str(&content).map_err(|e| {
            AppError::LlmUnavailable(format!("Structured response is not valid JSON: {}", e))
        })
    }
}
