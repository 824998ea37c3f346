//! Save command handler.

use super::prompt_store;
use clap::Args;
use promptsy_core::{config::AppConfig, AppError, AppResult};
use promptsy_prompt::PromptRecord;
use std::path::PathBuf;

/// Save a prompt to the store
#[derive(Args, Debug)]
#[command(group = clap::ArgGroup::new("source").required(true).args(["template", "file"]))]
pub struct SaveCommand {
    /// Hierarchical prompt name (e.g. examples.hello_world)
    pub name: String,

    /// What the prompt is for
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Template text with {placeholder} markers
    #[arg(short, long)]
    pub template: Option<String>,

    /// Read the template from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Store the template as a bare text document
    #[arg(long)]
    pub raw: bool,
}

impl SaveCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let template = match (&self.template, &self.file) {
            (Some(template), _) => template.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (None, None) => {
                return Err(AppError::Config(
                    "Either --template or --file is required".to_string(),
                ))
            }
        };

        let store = prompt_store(config)?;
        let path = if self.raw {
            store.save_raw(&template, &self.name)?
        } else {
            let record = PromptRecord::new(&self.name, &self.description, template)?;
            store.save(&record, &self.name)?
        };

        println!("{}", path.display());
        Ok(())
    }
}
