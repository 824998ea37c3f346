//! Few-shot example generation pipeline.
//!
//! `Generating(1..=N) -> Assembling -> Reformatting -> Persisting -> Done`.
//!
//! Examples are requested one at a time, in order. Any failure aborts the
//! whole run before anything is written, so a failed run leaves the store
//! as it was. There is no resuming; the caller starts over.

use crate::example::Example;
use promptsy_core::{AppConfig, AppError, AppResult};
use promptsy_llm::{ChatRequest, LlmClient};
use promptsy_prompt::{bundled, PromptRecord, PromptStore};
use std::collections::HashMap;
use std::sync::Arc;

/// Number of examples generated when the caller does not say.
pub const DEFAULT_NUM_EXAMPLES: usize = 5;

/// Parameters of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FewShotOptions {
    /// Examples to generate
    pub num_examples: usize,

    /// Allowed answers; empty means unconstrained
    pub expected_outputs: Vec<String>,
}

impl Default for FewShotOptions {
    fn default() -> Self {
        Self {
            num_examples: DEFAULT_NUM_EXAMPLES,
            expected_outputs: Vec::new(),
        }
    }
}

impl FewShotOptions {
    pub fn new(num_examples: usize) -> Self {
        Self {
            num_examples,
            ..Self::default()
        }
    }

    /// Constrain answers to `labels`.
    pub fn with_expected_outputs<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_outputs = labels.into_iter().map(Into::into).collect();
        self
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct FewShotOutcome {
    /// The input prompt with its reformatted template
    pub prompt: PromptRecord,

    /// Generated examples, in generation order
    pub examples: Vec<Example>,
}

/// Instruction prompts the pipeline sends to the LLM.
#[derive(Debug, Clone)]
pub struct FewShotInstructions {
    pub example_system: PromptRecord,
    pub example_system_labeled: PromptRecord,
    pub example_user: PromptRecord,
    pub example_user_labeled: PromptRecord,
    pub reformat: PromptRecord,
}

impl FewShotInstructions {
    /// The instructions shipped with the library.
    pub fn bundled() -> AppResult<Self> {
        Ok(Self {
            example_system: bundled::load_bundled(bundled::FEW_SHOT_EXAMPLE_SYSTEM)?,
            example_system_labeled: bundled::load_bundled(bundled::FEW_SHOT_EXAMPLE_SYSTEM_LABELED)?,
            example_user: bundled::load_bundled(bundled::FEW_SHOT_EXAMPLE_USER)?,
            example_user_labeled: bundled::load_bundled(bundled::FEW_SHOT_EXAMPLE_USER_LABELED)?,
            reformat: bundled::load_bundled(bundled::FEW_SHOT_REFORMAT)?,
        })
    }

    /// Instructions from `store`, falling back to the bundled ones.
    pub fn from_store(store: &PromptStore) -> AppResult<Self> {
        Ok(Self {
            example_system: store.load_or_bundled(bundled::FEW_SHOT_EXAMPLE_SYSTEM)?,
            example_system_labeled: store
                .load_or_bundled(bundled::FEW_SHOT_EXAMPLE_SYSTEM_LABELED)?,
            example_user: store.load_or_bundled(bundled::FEW_SHOT_EXAMPLE_USER)?,
            example_user_labeled: store.load_or_bundled(bundled::FEW_SHOT_EXAMPLE_USER_LABELED)?,
            reformat: store.load_or_bundled(bundled::FEW_SHOT_REFORMAT)?,
        })
    }
}

/// Generates few-shot examples for a prompt and folds them into its template.
pub struct FewShotGenerator {
    client: Arc<dyn LlmClient>,
    model: String,
    store: PromptStore,
    instructions: FewShotInstructions,
}

impl FewShotGenerator {
    /// Create a generator that persists results into `store`.
    ///
    /// `store` should be rooted apart from the general prompt store.
    pub fn new(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        store: PromptStore,
    ) -> AppResult<Self> {
        Ok(Self {
            client,
            model: model.into(),
            store,
            instructions: FewShotInstructions::bundled()?,
        })
    }

    /// Create a generator writing into `config.few_shot_dir` with `config.model`.
    pub fn from_config(config: &AppConfig, client: Arc<dyn LlmClient>) -> AppResult<Self> {
        let store = PromptStore::new(&config.few_shot_dir)?;
        Self::new(client, &config.model, store)
    }

    /// Replace the instruction prompts.
    pub fn with_instructions(mut self, instructions: FewShotInstructions) -> Self {
        self.instructions = instructions;
        self
    }

    /// Store the results are written to.
    pub fn store(&self) -> &PromptStore {
        &self.store
    }

    /// Run the full pipeline for `prompt`.
    ///
    /// # Errors
    /// - `ExampleGenerationFailed` if any example call fails or returns
    ///   something that is not an `Example`
    /// - `LlmUnavailable` if the reformatting call fails
    /// - store errors from persisting the result
    pub async fn generate(
        &self,
        prompt: &PromptRecord,
        options: &FewShotOptions,
    ) -> AppResult<FewShotOutcome> {
        // Resolve the destination before spending any LLM calls
        let target = self.store.resolve(prompt.name())?;
        tracing::info!(
            "Generating {} few-shot examples for '{}'",
            options.num_examples,
            prompt.name()
        );
        tracing::debug!("Few-shot prompt will be written to {}", target.display());

        let mut examples = Vec::with_capacity(options.num_examples);
        for index in 1..=options.num_examples {
            let example = self
                .generate_example_at(index, prompt.template(), &options.expected_outputs)
                .await?;
            tracing::debug!("Example {}/{} generated", index, options.num_examples);
            examples.push(example);
        }

        tracing::info!("Assembling {} examples", examples.len());
        let assembled = assemble_few_shot_prompt(prompt.template(), &examples);

        tracing::info!("Reformatting few-shot prompt '{}'", prompt.name());
        let template = self.reformat(&assembled).await?;
        let result = prompt.with_template(template);

        self.store.save(&result, result.name())?;
        tracing::info!("Few-shot prompt saved: {}", result.name());

        Ok(FewShotOutcome {
            prompt: result,
            examples,
        })
    }

    /// Generate a single example for `template`.
    pub async fn generate_example(
        &self,
        template: &str,
        expected_outputs: &[String],
    ) -> AppResult<Example> {
        self.generate_example_at(1, template, expected_outputs)
            .await
    }

    async fn generate_example_at(
        &self,
        index: usize,
        template: &str,
        labels: &[String],
    ) -> AppResult<Example> {
        let request = self.example_request(template, labels)?;
        let schema = Example::schema(labels);

        let value = self
            .client
            .complete_chat_structured(&request, &schema)
            .await
            .map_err(|e| AppError::ExampleGenerationFailed {
                index,
                reason: e.to_string(),
            })?;

        let example: Example =
            serde_json::from_value(value).map_err(|e| AppError::ExampleGenerationFailed {
                index,
                reason: format!("response does not match the example schema: {}", e),
            })?;

        if !labels.is_empty() && !labels.contains(&example.answer) {
            tracing::warn!(
                "Example {} answer '{}' is not one of: {}",
                index,
                example.answer,
                labels.join(", ")
            );
        }

        Ok(example)
    }

    fn example_request(&self, template: &str, labels: &[String]) -> AppResult<ChatRequest> {
        let mut values = HashMap::from([("prompt".to_string(), template.to_string())]);

        let (system, user) = if labels.is_empty() {
            (&self.instructions.example_system, &self.instructions.example_user)
        } else {
            values.insert("labels".to_string(), labels.join(", "));
            (
                &self.instructions.example_system_labeled,
                &self.instructions.example_user_labeled,
            )
        };

        Ok(ChatRequest::new(&self.model)
            .with_system(system.format(&values)?)
            .with_user(user.format(&values)?))
    }

    async fn reformat(&self, assembled: &str) -> AppResult<String> {
        let values = HashMap::from([("prompt".to_string(), assembled.to_string())]);
        let request =
            ChatRequest::new(&self.model).with_user(self.instructions.reformat.format(&values)?);

        let response = self.client.complete_chat(&request).await?;
        let template = response.content.trim();

        if template.is_empty() {
            return Err(AppError::LlmUnavailable(
                "Empty response while reformatting few-shot prompt".to_string(),
            ));
        }

        Ok(template.to_string())
    }
}

/// Append examples to a template under `# Examples`, followed by `# Output`.
///
/// Each example renders as `## Example {i}\n{question}\n{answer}\n\n`,
/// numbered from 1 in the order given.
pub fn assemble_few_shot_prompt(template: &str, examples: &[Example]) -> String {
    let formatted: String = examples
        .iter()
        .enumerate()
        .map(|(idx, example)| {
            format!(
                "## Example {}\n{}\n{}\n\n",
                idx + 1,
                example.question,
                example.answer
            )
        })
        .collect();

    format!("{}\n\n# Examples\n{}\n\n# Output\n", template, formatted)
}
