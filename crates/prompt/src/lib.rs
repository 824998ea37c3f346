//! Prompt system for Promptsy.
//!
//! This crate provides:
//! - `PromptRecord` with `{placeholder}` substitution
//! - Hierarchical names mapped to nested storage paths
//! - A YAML-backed `PromptStore`
//! - Instruction prompts bundled with the library

pub mod bundled;
pub mod naming;
pub mod store;
pub mod template;
pub mod types;

// Re-export main types
pub use bundled::{list_bundled, load_bundled};
pub use naming::{name_to_path, path_to_name, validate_name};
pub use store::PromptStore;
pub use types::{PromptRecord, StoredDocument};
