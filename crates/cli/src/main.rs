//! Promptsy CLI
//!
//! Main entry point for the promptsy command-line tool.
//! Stores, formats, enhances and few-shot-augments prompt templates.

mod commands;

use clap::{Parser, Subcommand};
use commands::{
    EnhanceCommand, FewShotCommand, FormatCommand, ListCommand, RunCommand, SaveCommand,
    ShowCommand,
};
use promptsy_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Promptsy - store, format and refine LLM prompt templates
#[derive(Parser, Debug)]
#[command(name = "promptsy")]
#[command(about = "Store, format and refine LLM prompt templates", long_about = None)]
#[command(version)]
struct Cli {
    /// Prompt store directory (default: ./prompts)
    #[arg(long, global = true, env = "PROMPTSY_PROMPTS_DIR")]
    prompts_dir: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "PROMPTSY_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    no_color: bool,

    /// LLM provider (openai, ollama, mock)
    #[arg(short, long, global = true, env = "PROMPTSY_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "PROMPTSY_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Save a prompt to the store
    Save(SaveCommand),

    /// Show a stored prompt
    Show(ShowCommand),

    /// List stored prompt names
    List(ListCommand),

    /// Render a prompt with placeholder values
    Format(FormatCommand),

    /// Rewrite a prompt's template with the LLM
    Enhance(EnhanceCommand),

    /// Generate few-shot examples and fold them into a prompt
    FewShot(FewShotCommand),

    /// Render a prompt and send it to the LLM
    Run(RunCommand),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Save(_) => "save",
            Commands::Show(_) => "show",
            Commands::List(_) => "list",
            Commands::Format(_) => "format",
            Commands::Enhance(_) => "enhance",
            Commands::FewShot(_) => "few-shot",
            Commands::Run(_) => "run",
        }
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    // Config file, then environment
    let config = AppConfig::load_from(cli.config.clone())?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.prompts_dir,
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;
    config.validate()?;

    tracing::debug!("Prompts: {:?}", config.prompts_dir);
    tracing::debug!("Few-shot prompts: {:?}", config.few_shot_dir);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let _span = tracing::info_span!("command", name = cli.command.name()).entered();

    let result = match cli.command {
        Commands::Save(cmd) => cmd.execute(&config),
        Commands::Show(cmd) => cmd.execute(&config),
        Commands::List(cmd) => cmd.execute(&config),
        Commands::Format(cmd) => cmd.execute(&config),
        Commands::Enhance(cmd) => cmd.execute(&config).await,
        Commands::FewShot(cmd) => cmd.execute(&config).await,
        Commands::Run(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::debug!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "promptsy",
            "list",
            "--prompts-dir",
            "/tmp/prompts",
            "--provider",
            "mock",
        ])
        .unwrap();

        assert_eq!(cli.prompts_dir, Some(PathBuf::from("/tmp/prompts")));
        assert_eq!(cli.provider.as_deref(), Some("mock"));
        assert_eq!(cli.command.name(), "list");
    }

    #[test]
    fn test_parse_few_shot_labels() {
        let cli = Cli::try_parse_from([
            "promptsy",
            "few-shot",
            "sentiment_analysis",
            "-n",
            "3",
            "--label",
            "positive",
            "--label",
            "negative",
        ])
        .unwrap();

        match cli.command {
            Commands::FewShot(cmd) => {
                assert_eq!(cmd.name, "sentiment_analysis");
                assert_eq!(cmd.num_examples, 3);
                assert_eq!(cmd.labels, vec!["positive", "negative"]);
            }
            other => panic!("Expected few-shot, got {:?}", other),
        }
    }

    #[test]
    fn test_no_color_env_accepts_conventional_values() {
        std::env::set_var("NO_COLOR", "1");
        let result = Cli::try_parse_from(["promptsy", "list"]);
        std::env::remove_var("NO_COLOR");

        let cli = result.unwrap();
        assert!(cli.no_color);
    }

    #[test]
    fn test_no_color_flag() {
        let cli = Cli::try_parse_from(["promptsy", "--no-color", "list"]).unwrap();
        assert!(cli.no_color);
    }

    #[test]
    fn test_save_requires_template_source() {
        let result = Cli::try_parse_from(["promptsy", "save", "greeting"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from([
            "promptsy",
            "save",
            "greeting",
            "--template",
            "Hi {name}",
            "--file",
            "greeting.txt",
        ]);
        assert!(result.is_err());
    }
}
