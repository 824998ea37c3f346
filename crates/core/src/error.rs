//! Error types for Promptsy.
//!
//! A single enum covers every failure the library can surface: store
//! lookups, document parsing, name validation, template formatting,
//! LLM collaborator failures and the few-shot pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for Promptsy.
///
/// Nothing is recovered locally. Every variant propagates to the caller.
#[derive(Error, Debug)]
pub enum AppError {
    /// No stored document exists for the name.
    #[error("Prompt '{name}' not found at {}", .path.display())]
    PromptNotFound { name: String, path: PathBuf },

    /// A document exists but cannot be parsed into a prompt record.
    #[error("Malformed prompt record: {0}")]
    MalformedRecord(String),

    /// A hierarchical name failed validation.
    #[error("Invalid prompt name: {0}")]
    InvalidName(String),

    /// A template placeholder had no value at format time.
    #[error("Missing value for placeholder '{{{0}}}'")]
    MissingPlaceholderValue(String),

    /// The LLM collaborator could not be reached or returned an error.
    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),

    /// A structured example call failed or returned an unusable payload.
    #[error("Failed to generate example {index}: {reason}")]
    ExampleGenerationFailed { index: usize, reason: String },

    /// A provider credential is required but not configured.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
