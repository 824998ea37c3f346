//! Show command handler.

use super::prompt_store;
use clap::Args;
use promptsy_core::{config::AppConfig, AppResult};

/// Show a stored prompt
#[derive(Args, Debug)]
pub struct ShowCommand {
    /// Prompt name
    pub name: String,

    /// Also list the template's placeholders
    #[arg(long)]
    pub placeholders: bool,
}

impl ShowCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let record = prompt_store(config)?.load(&self.name)?;

        println!("{}", record.describe());
        println!();
        println!("{}", record.template());

        if self.placeholders {
            println!();
            for placeholder in record.placeholders() {
                println!("{{{}}}", placeholder);
            }
        }

        Ok(())
    }
}
