//! Format command handler.

use super::{collect_vars, parse_var, prompt_store};
use clap::Args;
use promptsy_core::{config::AppConfig, AppResult};

/// Render a prompt with placeholder values
#[derive(Args, Debug)]
pub struct FormatCommand {
    /// Prompt name
    pub name: String,

    /// Placeholder value as key=value (repeatable)
    #[arg(long = "var", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,
}

impl FormatCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        println!("{}", self.render(config)?);
        Ok(())
    }

    fn render(&self, config: &AppConfig) -> AppResult<String> {
        let record = prompt_store(config)?.load(&self.name)?;
        record.format(&collect_vars(&self.vars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptsy_core::AppError;
    use promptsy_prompt::{PromptRecord, PromptStore};
    use tempfile::TempDir;

    fn setup() -> (TempDir, AppConfig) {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig {
            prompts_dir: temp_dir.path().join("prompts"),
            ..AppConfig::default()
        };
        let record = PromptRecord::new(
            "toddlers_story_time",
            "Write a bedtime story for toddlers",
            "Write a story about a {animal} that goes to {place}.",
        )
        .unwrap();
        PromptStore::new(&config.prompts_dir)
            .unwrap()
            .save(&record, record.name())
            .unwrap();
        (temp_dir, config)
    }

    #[test]
    fn test_render_with_vars() {
        let (_temp_dir, config) = setup();
        let command = FormatCommand {
            name: "toddlers_story_time".to_string(),
            vars: vec![
                ("animal".to_string(), "cat".to_string()),
                ("place".to_string(), "the moon".to_string()),
            ],
        };
        assert_eq!(
            command.render(&config).unwrap(),
            "Write a story about a cat that goes to the moon."
        );
    }

    #[test]
    fn test_render_missing_var() {
        let (_temp_dir, config) = setup();
        let command = FormatCommand {
            name: "toddlers_story_time".to_string(),
            vars: vec![("animal".to_string(), "cat".to_string())],
        };
        assert!(matches!(
            command.render(&config),
            Err(AppError::MissingPlaceholderValue(ref key)) if key == "place"
        ));
    }
}
