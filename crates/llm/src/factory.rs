//! LLM provider factory.
//!
//! Builds a client from a provider name, an optional endpoint and an
//! optional API key. Credentials are passed in explicitly; the factory
//! never looks them up itself.

use crate::client::LlmClient;
use crate::providers::{MockClient, OllamaClient, OpenAiClient};
use crate::types::ProviderType;
use promptsy_core::{AppConfig, AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openai", "ollama", "mock")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key for providers that require one
///
/// # Errors
/// - `MissingCredential` if the provider needs a key and none was given
/// - `Config` if the provider is unknown
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    match provider_type {
        ProviderType::OpenAI => {
            let api_key = api_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
                AppError::MissingCredential("OpenAI provider requires an API key".to_string())
            })?;
            let client = match endpoint {
                Some(url) => OpenAiClient::with_base_url(url, api_key),
                None => OpenAiClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        ProviderType::Ollama => {
            let client = match endpoint {
                Some(url) => OllamaClient::with_base_url(url),
                None => OllamaClient::new(),
            };
            Ok(Arc::new(client))
        }
        ProviderType::Mock => Ok(Arc::new(MockClient::echo())),
    }
}

/// Create the client for the configured provider.
pub fn client_from_config(config: &AppConfig) -> AppResult<Arc<dyn LlmClient>> {
    let api_key = config.resolve_api_key(&config.provider);
    create_client(
        &config.provider,
        config.endpoint.as_deref(),
        api_key.as_deref(),
    )
}
