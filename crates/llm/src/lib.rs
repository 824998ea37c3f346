//! LLM integration crate for Promptsy.
//!
//! A provider-agnostic collaborator with two operations: free-form chat
//! completion and schema-constrained chat completion.
//!
//! # Providers
//! - **OpenAI** (and compatible servers)
//! - **Ollama**: local runtime
//! - **Mock**: scripted responses for tests and offline runs
//!
//! # Example
//! ```no_run
//! use promptsy_llm::{ChatRequest, LlmClient, providers::OpenAiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new("sk-...");
//! let request = ChatRequest::new("gpt-4o-mini").with_user("Hello, world!");
//! let response = client.complete_chat(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{ChatRequest, ChatResponse, LlmClient, LlmUsage};
pub use factory::{client_from_config, create_client};
pub use providers::{MockClient, OllamaClient, OpenAiClient};
pub use types::{ChatMessage, ChatRole, ProviderType, ResponseSchema};
