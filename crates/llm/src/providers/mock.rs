//! Scripted provider for tests and offline runs.

use crate::client::{ChatRequest, ChatResponse, LlmClient, LlmUsage};
use crate::types::ResponseSchema;
use promptsy_core::{AppError, AppResult};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A request the mock received, with the schema when it was structured.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub request: ChatRequest,
    pub schema: Option<ResponseSchema>,
}

/// Mock client that replays queued responses in order.
///
/// Chat and structured responses live in separate queues. An exhausted
/// queue answers with `LlmUnavailable`, so a test scripts failures by
/// queueing fewer responses than calls, or by pushing an explicit error.
#[derive(Debug, Default)]
pub struct MockClient {
    chat: Mutex<VecDeque<AppResult<String>>>,
    structured: Mutex<VecDeque<AppResult<serde_json::Value>>>,
    calls: Mutex<Vec<RecordedCall>>,
    echo: bool,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that answers chat calls with the last user message and
    /// structured calls with a placeholder example. Used by the `mock`
    /// provider so the CLI runs without network access.
    pub fn echo() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    /// Queue a successful chat completion.
    pub fn push_chat(&self, content: impl Into<String>) -> &Self {
        lock(&self.chat).push_back(Ok(content.into()));
        self
    }

    /// Queue a failing chat completion.
    pub fn push_chat_error(&self, message: impl Into<String>) -> &Self {
        lock(&self.chat).push_back(Err(AppError::LlmUnavailable(message.into())));
        self
    }

    /// Queue a successful structured completion.
    pub fn push_structured(&self, value: serde_json::Value) -> &Self {
        lock(&self.structured).push_back(Ok(value));
        self
    }

    /// Queue a failing structured completion.
    pub fn push_structured_error(&self, message: impl Into<String>) -> &Self {
        lock(&self.structured).push_back(Err(AppError::LlmUnavailable(message.into())));
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, request: &ChatRequest, schema: Option<&ResponseSchema>) {
        lock(&self.calls).push(RecordedCall {
            request: request.clone(),
            schema: schema.cloned(),
        });
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    // A panicking test thread must not wedge the others
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete_chat(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        self.record(request, None);

        let next = lock(&self.chat).pop_front();
        let content = match next {
            Some(result) => result?,
            None if self.echo => request
                .messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default(),
            None => {
                return Err(AppError::LlmUnavailable(
                    "Mock has no chat response queued".to_string(),
                ))
            }
        };

        Ok(ChatResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }

    async fn complete_chat_structured(
        &self,
        request: &ChatRequest,
        schema: &ResponseSchema,
    ) -> AppResult<serde_json::Value> {
        self.record(request, Some(schema));

        let next = lock(&self.structured).pop_front();
        match next {
            Some(result) => result,
            None if self.echo => Ok(echo_structured(schema)),
            None => Err(AppError::LlmUnavailable(
                "Mock has no structured response queued".to_string(),
            )),
        }
    }
}

/// Fill every string property of an object schema, preferring the first
/// enum member when one is given.
fn echo_structured(schema: &ResponseSchema) -> serde_json::Value {
    let mut object = serde_json::Map::new();

    if let Some(properties) = schema.schema.get("properties").and_then(|p| p.as_object()) {
        for (key, property) in properties {
            let value = property
                .get("enum")
                .and_then(|e| e.as_array())
                .and_then(|members| members.first().cloned())
                .unwrap_or_else(|| serde_json::Value::String(format!("mock {}", key)));
            object.insert(key.clone(), value);
        }
    }

    serde_json::Value::Object(object)
}
