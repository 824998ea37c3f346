//! List command handler.

use super::prompt_store;
use clap::Args;
use promptsy_core::{config::AppConfig, AppResult};
use promptsy_prompt::{list_bundled, PromptStore};

/// List stored prompt names
#[derive(Args, Debug)]
pub struct ListCommand {
    /// List the few-shot store instead of the prompt store
    #[arg(long, conflicts_with = "bundled")]
    pub few_shot: bool,

    /// List the instruction prompts shipped with promptsy
    #[arg(long)]
    pub bundled: bool,
}

impl ListCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        for name in self.names(config)? {
            println!("{}", name);
        }
        Ok(())
    }

    fn names(&self, config: &AppConfig) -> AppResult<Vec<String>> {
        let mut names = if self.bundled {
            list_bundled().into_iter().map(str::to_string).collect()
        } else if self.few_shot {
            PromptStore::new(&config.few_shot_dir)?.list()?
        } else {
            prompt_store(config)?.list()?
        };

        names.sort();
        tracing::debug!("Listing {} prompts", names.len());
        Ok(names)
    }
}
