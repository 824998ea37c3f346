//! Command handlers for the Promptsy CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod enhance;
pub mod few_shot;
pub mod format;
pub mod list;
pub mod run;
pub mod save;
pub mod show;

// Re-export command types for convenience
pub use enhance::EnhanceCommand;
pub use few_shot::FewShotCommand;
pub use format::FormatCommand;
pub use list::ListCommand;
pub use run::RunCommand;
pub use save::SaveCommand;
pub use show::ShowCommand;

use promptsy_core::{config::AppConfig, AppResult};
use promptsy_prompt::PromptStore;
use std::collections::HashMap;

/// Parse a `key=value` placeholder assignment.
///
/// Only the first `=` separates; the value may contain more.
pub fn parse_var(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty placeholder name in '{}'", raw));
    }

    Ok((key.to_string(), value.to_string()))
}

/// Collect parsed `--var` pairs; later assignments win.
pub fn collect_vars(vars: &[(String, String)]) -> HashMap<String, String> {
    vars.iter().cloned().collect()
}

/// Open the general prompt store.
pub fn prompt_store(config: &AppConfig) -> AppResult<PromptStore> {
    PromptStore::new(&config.prompts_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var() {
        assert_eq!(
            parse_var("animal=cat").unwrap(),
            ("animal".to_string(), "cat".to_string())
        );
        assert_eq!(
            parse_var("query=a=b").unwrap(),
            ("query".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_var("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
    }

    #[test]
    fn test_parse_var_rejects_malformed() {
        assert!(parse_var("animal").is_err());
        assert!(parse_var("=cat").is_err());
    }

    #[test]
    fn test_collect_vars_last_wins() {
        let vars = vec![
            ("a".to_string(), "1".to_string()),
            ("a".to_string(), "2".to_string()),
        ];
        assert_eq!(collect_vars(&vars)["a"], "2");
    }
}
