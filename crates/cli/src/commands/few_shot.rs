//! Few-shot command handler.

use super::prompt_store;
use clap::Args;
use promptsy_core::{config::AppConfig, AppResult};
use promptsy_llm::client_from_config;
use promptsy_refine::{
    FewShotGenerator, FewShotInstructions, FewShotOptions, FewShotOutcome,
};

/// Generate few-shot examples and fold them into a prompt
#[derive(Args, Debug)]
pub struct FewShotCommand {
    /// Prompt name
    pub name: String,

    /// Number of examples to generate
    #[arg(short = 'n', long, default_value_t = promptsy_refine::few_shot::DEFAULT_NUM_EXAMPLES)]
    pub num_examples: usize,

    /// Allowed answer (repeatable); constrains every example's answer
    #[arg(short, long = "label")]
    pub labels: Vec<String>,

    /// Print the generated examples after the prompt
    #[arg(long)]
    pub show_examples: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl FewShotCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let outcome = self.generate(config).await?;

        if self.json {
            let output = serde_json::json!({
                "name": outcome.prompt.name(),
                "description": outcome.prompt.description(),
                "template": outcome.prompt.template(),
                "examples": outcome.examples,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("{}", outcome.prompt.template());

        if self.show_examples {
            for (idx, example) in outcome.examples.iter().enumerate() {
                println!();
                println!("--- Example {} ---", idx + 1);
                println!("Q: {}", example.question);
                println!("A: {}", example.answer);
            }
        }

        Ok(())
    }

    async fn generate(&self, config: &AppConfig) -> AppResult<FewShotOutcome> {
        let store = prompt_store(config)?;
        let prompt = store.load(&self.name)?;

        let client = client_from_config(config)?;
        let generator = FewShotGenerator::from_config(config, client)?
            .with_instructions(FewShotInstructions::from_store(&store)?);

        let options =
            FewShotOptions::new(self.num_examples).with_expected_outputs(self.labels.clone());
        generator.generate(&prompt, &options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptsy_prompt::{PromptRecord, PromptStore};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_few_shot_with_mock_provider() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig {
            prompts_dir: temp_dir.path().join("prompts"),
            few_shot_dir: temp_dir.path().join("auto_few_shot_prompts"),
            provider: "mock".to_string(),
            ..AppConfig::default()
        };

        let record = PromptRecord::new(
            "sentiment_analysis",
            "make a sentiment analysis prompt",
            "Classify the sentiment of the following text: {text}",
        )
        .unwrap();
        PromptStore::new(&config.prompts_dir)
            .unwrap()
            .save(&record, record.name())
            .unwrap();

        let command = FewShotCommand {
            name: "sentiment_analysis".to_string(),
            num_examples: 2,
            labels: vec!["positive".to_string(), "negative".to_string()],
            show_examples: false,
            json: false,
        };
        let outcome = command.generate(&config).await.unwrap();

        assert_eq!(outcome.examples.len(), 2);
        assert!(outcome.examples.iter().all(|e| e.answer == "positive"));

        let saved = PromptStore::new(&config.few_shot_dir)
            .unwrap()
            .load("sentiment_analysis")
            .unwrap();
        assert_eq!(saved, outcome.prompt);

        // The general store keeps the original template
        assert_eq!(
            PromptStore::new(&config.prompts_dir)
                .unwrap()
                .load("sentiment_analysis")
                .unwrap()
                .template(),
            "Classify the sentiment of the following text: {text}"
        );
    }
}
