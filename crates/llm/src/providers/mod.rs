//! LLM provider implementations.

pub mod mock;
pub mod ollama;
pub mod openai;

pub use mock::{MockClient, RecordedCall};
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
