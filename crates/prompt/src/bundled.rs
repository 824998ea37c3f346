//! Prompts compiled into the crate.
//!
//! These are the instruction prompts the enhancer and the few-shot
//! pipeline send to the LLM. A store can shadow any of them by saving a
//! prompt under the same name (see [`PromptStore::load_or_bundled`]).

use crate::naming;
use crate::store::PromptStore;
use crate::types::{PromptRecord, StoredDocument};
use promptsy_core::{AppError, AppResult};
use std::path::PathBuf;

pub const ENHANCER_IMPROVE: &str = "enhancer.improve";
pub const FEW_SHOT_EXAMPLE_SYSTEM: &str = "few_shot.example_system";
pub const FEW_SHOT_EXAMPLE_SYSTEM_LABELED: &str = "few_shot.example_system_labeled";
pub const FEW_SHOT_EXAMPLE_USER: &str = "few_shot.example_user";
pub const FEW_SHOT_EXAMPLE_USER_LABELED: &str = "few_shot.example_user_labeled";
pub const FEW_SHOT_REFORMAT: &str = "few_shot.reformat";

const BUNDLED: &[(&str, &str)] = &[
    (
        ENHANCER_IMPROVE,
        include_str!("../prompts/enhancer/improve.yaml"),
    ),
    (
        FEW_SHOT_EXAMPLE_SYSTEM,
        include_str!("../prompts/few_shot/example_system.yaml"),
    ),
    (
        FEW_SHOT_EXAMPLE_SYSTEM_LABELED,
        include_str!("../prompts/few_shot/example_system_labeled.yaml"),
    ),
    (
        FEW_SHOT_EXAMPLE_USER,
        include_str!("../prompts/few_shot/example_user.yaml"),
    ),
    (
        FEW_SHOT_EXAMPLE_USER_LABELED,
        include_str!("../prompts/few_shot/example_user_labeled.yaml"),
    ),
    (
        FEW_SHOT_REFORMAT,
        include_str!("../prompts/few_shot/reformat.yaml"),
    ),
];

/// Load a bundled prompt by name.
pub fn load_bundled(name: &str) -> AppResult<PromptRecord> {
    let (_, contents) = BUNDLED
        .iter()
        .find(|(bundled_name, _)| *bundled_name == name)
        .ok_or_else(|| AppError::PromptNotFound {
            name: name.to_string(),
            path: PathBuf::from("<bundled>")
                .join(naming::name_to_path(name).unwrap_or_else(|_| PathBuf::from(name))),
        })?;

    StoredDocument::from_yaml(contents)?.into_record(name)
}

/// Names of all bundled prompts.
pub fn list_bundled() -> Vec<&'static str> {
    BUNDLED.iter().map(|(name, _)| *name).collect()
}

impl PromptStore {
    /// Load `name` from the store, falling back to the bundled prompt of
    /// the same name when the store has none.
    pub fn load_or_bundled(&self, name: &str) -> AppResult<PromptRecord> {
        match self.load(name) {
            Err(AppError::PromptNotFound { .. }) => load_bundled(name),
            other => other,
        }
    }
}
