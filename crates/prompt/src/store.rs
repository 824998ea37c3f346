//! File-backed prompt store.
//!
//! One YAML document per hierarchical name, laid out by
//! [`crate::naming::name_to_path`] under a base directory.

use crate::naming::{self, DOCUMENT_EXTENSION};
use crate::types::{PromptRecord, StoredDocument};
use promptsy_core::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Store rooted at a base directory.
///
/// Assumes a single writer per base directory. Concurrent saves to the
/// same name race and the last write wins.
#[derive(Debug, Clone)]
pub struct PromptStore {
    base_dir: PathBuf,
}

impl PromptStore {
    /// Open a store, creating the base directory if needed.
    ///
    /// # Example
    /// ```no_run
    /// use promptsy_prompt::{PromptRecord, PromptStore};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let store = PromptStore::new("prompts")?;
    /// let prompt = PromptRecord::new("hello_world", "An example prompt", "Hello, {name}!")?;
    /// store.save(&prompt, prompt.name())?;
    /// let loaded = store.load("hello_world")?;
    /// println!("{}", loaded);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(base_dir: impl Into<PathBuf>) -> AppResult<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// File path for a name.
    pub fn resolve(&self, name: &str) -> AppResult<PathBuf> {
        let mut path = self.base_dir.join(naming::name_to_path(name)?);
        path.set_extension(DOCUMENT_EXTENSION);
        Ok(path)
    }

    /// Save a prompt record under `name`, replacing any existing document.
    pub fn save(&self, record: &PromptRecord, name: &str) -> AppResult<PathBuf> {
        self.save_document(&StoredDocument::Record(record.clone()), name)
    }

    /// Save bare template text under `name`.
    pub fn save_raw(&self, text: &str, name: &str) -> AppResult<PathBuf> {
        self.save_document(&StoredDocument::Raw(text.to_string()), name)
    }

    /// Write a document under `name` and return the path written.
    pub fn save_document(&self, document: &StoredDocument, name: &str) -> AppResult<PathBuf> {
        let path = self.resolve(name)?;
        let contents = document.to_yaml()?;

        if let Some(parent) = path.parent() {
            // Idempotent; an existing directory is not an error
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;

        tracing::info!("Prompt saved to {}", path.display());
        Ok(path)
    }

    /// Load the document stored under `name`.
    pub fn load_document(&self, name: &str) -> AppResult<StoredDocument> {
        let path = self.resolve(name)?;
        tracing::debug!("Loading prompt from: {:?}", path);

        if !path.is_file() {
            return Err(AppError::PromptNotFound {
                name: name.to_string(),
                path,
            });
        }

        let contents = fs::read_to_string(&path)?;
        StoredDocument::from_yaml(&contents).map_err(|e| match e {
            AppError::MalformedRecord(reason) => {
                AppError::MalformedRecord(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })
    }

    /// Load the record stored under `name`.
    ///
    /// Raw documents come back as a record named `name` with an empty
    /// description.
    pub fn load(&self, name: &str) -> AppResult<PromptRecord> {
        let record = self.load_document(name)?.into_record(name)?;
        tracing::info!("Loaded prompt: {}", record.name());
        Ok(record)
    }

    /// Whether a document exists for `name`.
    pub fn exists(&self, name: &str) -> bool {
        self.resolve(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Names of every stored document. Order is unspecified.
    pub fn list(&self) -> AppResult<Vec<String>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();

        for entry in walkdir::WalkDir::new(&self.base_dir)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let Ok(relative) = entry.path().strip_prefix(&self.base_dir) else {
                continue;
            };

            match naming::path_to_name(relative) {
                Some(name) => names.push(name),
                None => tracing::debug!("Skipping non-prompt file: {:?}", entry.path()),
            }
        }

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn store() -> (TempDir, PromptStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = PromptStore::new(temp_dir.path().join("test_prompts")).unwrap();
        (temp_dir, store)
    }

    fn record(name: &str, template: &str) -> PromptRecord {
        PromptRecord::new(name, "A test prompt", template).unwrap()
    }

    #[test]
    fn test_store_creates_base_dir() {
        let (_temp_dir, store) = store();
        assert!(store.base_dir().is_dir());
    }

    #[test]
    fn test_resolve() {
        let (_temp_dir, store) = store();
        assert_eq!(
            store.resolve("custom_prompt").unwrap(),
            store.base_dir().join("custom").join("custom_prompt.yaml")
        );
        assert_eq!(
            store.resolve("examples.hello_world").unwrap(),
            store.base_dir().join("examples").join("hello_world.yaml")
        );
        assert!(matches!(
            store.resolve("bad..name"),
            Err(AppError::InvalidName(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let (_temp_dir, store) = store();
        let prompt = record("hello_world", "Hello, {name}!\n\nBye.");

        let path = store.save(&prompt, prompt.name()).unwrap();
        assert!(path.is_file());

        let loaded = store.load("hello_world").unwrap();
        assert_eq!(loaded, prompt);
    }

    #[test]
    fn test_overwrite_keeps_single_document() {
        let (_temp_dir, store) = store();
        store.save(&record("greeting", "first"), "greeting").unwrap();
        store.save(&record("greeting", "second"), "greeting").unwrap();

        assert_eq!(store.list().unwrap(), vec!["custom.greeting".to_string()]);
        assert_eq!(store.load("greeting").unwrap().template(), "second");
    }

    #[test]
    fn test_save_raw() {
        let (_temp_dir, store) = store();
        store.save_raw("Hello, {name}!", "custom_prompt").unwrap();

        assert_eq!(
            store.load_document("custom_prompt").unwrap(),
            StoredDocument::Raw("Hello, {name}!".to_string())
        );
        let loaded = store.load("custom_prompt").unwrap();
        assert_eq!(loaded.name(), "custom_prompt");
        assert_eq!(loaded.template(), "Hello, {name}!");
    }

    #[test]
    fn test_load_non_existent_prompt() {
        let (_temp_dir, store) = store();
        match store.load("non_existent_prompt") {
            Err(AppError::PromptNotFound { name, path }) => {
                assert_eq!(name, "non_existent_prompt");
                assert!(path.ends_with("custom/non_existent_prompt.yaml"));
            }
            other => panic!("Expected PromptNotFound, got {:?}", other),
        }
        assert!(!store.exists("non_existent_prompt"));
    }

    #[test]
    fn test_load_malformed_document() {
        let (_temp_dir, store) = store();
        let path = store.resolve("broken").unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "text:\n  name: broken\n").unwrap();

        assert!(matches!(
            store.load("broken"),
            Err(AppError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_load_legacy_document() {
        let (_temp_dir, store) = store();
        let path = store.resolve("examples.legacy").unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "text:\n  description: Old prompt\n  name: legacy\n  template: 'Hi {who}'\n",
        )
        .unwrap();

        let loaded = store.load("examples.legacy").unwrap();
        assert_eq!(loaded.name(), "legacy");
        assert_eq!(loaded.template(), "Hi {who}");
    }

    #[test]
    fn test_list_prompts() {
        let (_temp_dir, store) = store();
        store.save_raw("Hello, {name}!", "examples.hello_world").unwrap();
        store.save_raw("Goodbye, {name}!", "examples.goodbye").unwrap();
        store.save_raw("Custom prompt", "custom_prompt").unwrap();
        fs::write(store.base_dir().join("README.txt"), "not a prompt").unwrap();

        let names: HashSet<String> = store.list().unwrap().into_iter().collect();
        let expected: HashSet<String> = ["examples.hello_world", "examples.goodbye", "custom.custom_prompt"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_listed_names_load() {
        let (_temp_dir, store) = store();
        store.save(&record("deep", "x"), "a.b.deep").unwrap();
        store.save(&record("flat", "y"), "flat").unwrap();

        for name in store.list().unwrap() {
            assert!(store.load(&name).is_ok(), "listed name '{}' should load", name);
        }
    }
}
