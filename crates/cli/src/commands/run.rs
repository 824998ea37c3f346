//! Run command handler.
//!
//! Formats a stored prompt and sends it as a single user message.

use super::{collect_vars, parse_var, prompt_store};
use clap::Args;
use promptsy_core::{config::AppConfig, AppResult};
use promptsy_llm::{client_from_config, ChatRequest, ChatResponse};

/// Render a prompt and send it to the LLM
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Prompt name
    pub name: String,

    /// Placeholder value as key=value (repeatable)
    #[arg(long = "var", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Maximum tokens in response
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Temperature for response generation (0.0-2.0)
    #[arg(long)]
    pub temperature: Option<f32>,
}

impl RunCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let response = self.complete(config).await?;
        println!("{}", response.content);
        Ok(())
    }

    async fn complete(&self, config: &AppConfig) -> AppResult<ChatResponse> {
        let record = prompt_store(config)?.load(&self.name)?;
        let text = record.format(&collect_vars(&self.vars))?;

        let mut request = ChatRequest::new(&config.model).with_user(text);
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        let client = client_from_config(config)?;
        tracing::info!("Running '{}' on {}", self.name, client.provider_name());
        let response = client.complete_chat(&request).await?;

        tracing::debug!(
            "Tokens: {} prompt, {} completion",
            response.usage.prompt_tokens,
            response.usage.completion_tokens
        );

        Ok(response)
    }
}
