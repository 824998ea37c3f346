//! Configuration management for Promptsy.
//!
//! Configuration is layered, lowest precedence first:
//! - Built-in defaults
//! - Config file (`promptsy.yaml` in the working directory, or `PROMPTSY_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Components never read credentials from the environment on their own.
//! They receive what they need from an `AppConfig` at construction time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Providers the LLM factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 3] = ["openai", "ollama", "mock"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base directory of the general prompt store
    pub prompts_dir: PathBuf,

    /// Base directory the few-shot pipeline writes into
    pub few_shot_dir: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// LLM provider ("openai", "ollama", "mock")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Custom provider endpoint
    pub endpoint: Option<String>,

    /// Explicit API key (PROMPTSY_API_KEY)
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// LLM provider configurations from the config file
    pub llm: Option<LlmConfig>,
}

/// LLM configuration from promptsy.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    OpenAI {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
    },
}

impl ProviderConfig {
    /// Model configured for this provider.
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAI { model, .. } | Self::Ollama { model, .. } => model,
        }
    }

    /// Endpoint configured for this provider, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::OpenAI { endpoint, .. } => endpoint.as_deref(),
            Self::Ollama { endpoint, .. } => Some(endpoint),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    storage: Option<StorageConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageConfig {
    #[serde(rename = "promptsDir")]
    prompts_dir: Option<String>,
    #[serde(rename = "fewShotDir")]
    few_shot_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prompts_dir: PathBuf::from("prompts"),
            few_shot_dir: PathBuf::from("auto_few_shot_prompts"),
            config_file: None,
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            endpoint: None,
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file and environment variables.
    ///
    /// Environment variables:
    /// - `PROMPTSY_CONFIG`: Path to config file
    /// - `PROMPTSY_PROMPTS_DIR`: Prompt store directory
    /// - `PROMPTSY_FEW_SHOT_DIR`: Few-shot output directory
    /// - `PROMPTSY_PROVIDER`: LLM provider
    /// - `PROMPTSY_MODEL`: Model identifier
    /// - `PROMPTSY_API_KEY`: API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use promptsy_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Prompts: {:?}", config.prompts_dir);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(std::env::var("PROMPTSY_CONFIG").ok().map(PathBuf::from))
    }

    /// Load configuration using an explicit config file.
    ///
    /// `None` falls back to `promptsy.yaml` in the working directory, which
    /// may be absent. An explicit file that does not exist is an error.
    pub fn load_from(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self {
            config_file,
            ..Self::default()
        };

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("promptsy.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(dir) = std::env::var("PROMPTSY_PROMPTS_DIR") {
            config.prompts_dir = PathBuf::from(dir);
        }

        if let Ok(dir) = std::env::var("PROMPTSY_FEW_SHOT_DIR") {
            config.few_shot_dir = PathBuf::from(dir);
        }

        if let Ok(provider) = std::env::var("PROMPTSY_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("PROMPTSY_MODEL") {
            config.model = model;
        }

        if let Ok(key) = std::env::var("PROMPTSY_API_KEY") {
            config.api_key = Some(key);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(storage) = config_file.storage {
            if let Some(dir) = storage.prompts_dir {
                result.prompts_dir = PathBuf::from(dir);
            }
            if let Some(dir) = storage.few_shot_dir {
                result.few_shot_dir = PathBuf::from(dir);
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model().to_string();
                result.endpoint = provider_config.endpoint().map(str::to_string);
            }

            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over the config file and environment.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        prompts_dir: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(prompts_dir) = prompts_dir {
            self.prompts_dir = prompts_dir;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            // A provider switch invalidates the endpoint picked for the old one
            if provider != self.provider {
                self.endpoint = self
                    .get_provider_config(&provider)
                    .and_then(|pc| pc.endpoint().map(str::to_string));
            }
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the configuration block for a provider.
    pub fn get_provider_config(&self, provider: &str) -> Option<ProviderConfig> {
        self.llm
            .as_ref()
            .and_then(|llm| llm.providers.get(provider).cloned())
    }

    /// Resolve the API key for a provider.
    ///
    /// Order: `PROMPTSY_API_KEY`, the provider's `apiKeyEnv`, then
    /// `OPENAI_API_KEY` for the `openai` provider.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        if let Some(ProviderConfig::OpenAI { api_key_env, .. }) = self.get_provider_config(provider)
        {
            if let Ok(key) = std::env::var(&api_key_env) {
                return Some(key);
            }
        }

        if provider == "openai" {
            return std::env::var("OPENAI_API_KEY").ok();
        }

        None
    }

    /// Resolve the API key or fail with `MissingCredential`.
    pub fn require_api_key(&self, provider: &str) -> AppResult<String> {
        self.resolve_api_key(provider).ok_or_else(|| {
            AppError::MissingCredential(format!(
                "No API key for provider '{}'. Set PROMPTSY_API_KEY or OPENAI_API_KEY.",
                provider
            ))
        })
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        if !KNOWN_PROVIDERS.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.prompts_dir == self.few_shot_dir {
            return Err(AppError::Config(format!(
                "Few-shot directory must differ from the prompts directory: {:?}",
                self.prompts_dir
            )));
        }

        Ok(())
    }
}
