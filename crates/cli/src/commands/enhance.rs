//! Enhance command handler.

use super::prompt_store;
use clap::Args;
use promptsy_core::{config::AppConfig, AppResult};
use promptsy_llm::client_from_config;
use promptsy_prompt::{bundled, PromptRecord};
use promptsy_refine::PromptEnhancer;

/// Rewrite a prompt's template with the LLM
#[derive(Args, Debug)]
pub struct EnhanceCommand {
    /// Prompt name
    pub name: String,

    /// Number of enhancement rounds
    #[arg(short, long, default_value_t = 1)]
    pub iterations: usize,

    /// Save the enhanced prompt under this name
    #[arg(long)]
    pub save_as: Option<String>,
}

impl EnhanceCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let enhanced = self.enhance(config).await?;
        println!("{}", enhanced.template());
        Ok(())
    }

    async fn enhance(&self, config: &AppConfig) -> AppResult<PromptRecord> {
        let store = prompt_store(config)?;
        let record = store.load(&self.name)?;

        // A stored enhancer.improve overrides the bundled instruction
        let instruction = store.load_or_bundled(bundled::ENHANCER_IMPROVE)?;
        let client = client_from_config(config)?;
        let enhancer = PromptEnhancer::with_instruction(client, &config.model, instruction);

        let enhanced = enhancer
            .enhance_iteratively(&record, self.iterations)
            .await?;

        if let Some(ref target) = self.save_as {
            let path = store.save(&enhanced, target)?;
            tracing::info!("Enhanced prompt saved to {}", path.display());
        }

        Ok(enhanced)
    }
}
