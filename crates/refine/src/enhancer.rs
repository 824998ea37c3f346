//! LLM-driven prompt enhancement.

use promptsy_core::{AppError, AppResult};
use promptsy_llm::{ChatRequest, LlmClient};
use promptsy_prompt::{bundled, PromptRecord};
use std::collections::HashMap;
use std::sync::Arc;

/// Asks the LLM for a qualitatively better version of a prompt.
///
/// Enhancement is not idempotent. Each call rewrites the template again,
/// which is what [`PromptEnhancer::enhance_iteratively`] relies on.
pub struct PromptEnhancer {
    client: Arc<dyn LlmClient>,
    model: String,
    instruction: PromptRecord,
}

impl PromptEnhancer {
    /// Create an enhancer using the bundled `enhancer.improve` instruction.
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> AppResult<Self> {
        let instruction = bundled::load_bundled(bundled::ENHANCER_IMPROVE)?;
        Ok(Self::with_instruction(client, model, instruction))
    }

    /// Create an enhancer with a custom instruction prompt.
    ///
    /// The instruction receives the template to improve as `{prompt}`.
    pub fn with_instruction(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        instruction: PromptRecord,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            instruction,
        }
    }

    /// Return `record` with an LLM-improved template.
    ///
    /// Name and description are unchanged. The response is accepted as
    /// long as it is not blank.
    pub async fn enhance(&self, record: &PromptRecord) -> AppResult<PromptRecord> {
        tracing::info!("Enhancing prompt: {}", record.name());

        let values = HashMap::from([("prompt".to_string(), record.template().to_string())]);
        let request = ChatRequest::new(&self.model).with_user(self.instruction.format(&values)?);

        let response = self.client.complete_chat(&request).await?;
        let template = response.content.trim();

        if template.is_empty() {
            return Err(AppError::LlmUnavailable(format!(
                "Empty enhancement returned for prompt '{}'",
                record.name()
            )));
        }

        tracing::debug!(
            "Enhanced '{}': {} -> {} chars",
            record.name(),
            record.template().len(),
            template.len()
        );

        Ok(record.with_template(template))
    }

    /// Apply [`PromptEnhancer::enhance`] `iterations` times, feeding each
    /// result into the next call.
    pub async fn enhance_iteratively(
        &self,
        record: &PromptRecord,
        iterations: usize,
    ) -> AppResult<PromptRecord> {
        let mut current = record.clone();
        for round in 1..=iterations {
            tracing::debug!("Enhancement round {}/{}", round, iterations);
            current = self.enhance(&current).await?;
        }
        Ok(current)
    }
}
