//! Prompt types for Promptsy.
//!
//! `PromptRecord` is the unit callers work with. `StoredDocument` is what
//! the store writes to disk, wrapped in a versioned YAML envelope.

use crate::naming::validate_name;
use crate::template;
use promptsy_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::fmt;

/// Current on-disk document version.
pub const DOCUMENT_VERSION: u32 = 1;

/// A named, described, placeholder-bearing template.
///
/// Fields are private; a changed template produces a new record through
/// [`PromptRecord::with_template`]. The name always satisfies
/// [`validate_name`], however the record was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordFields")]
pub struct PromptRecord {
    name: String,
    description: String,
    template: String,
}

#[derive(Deserialize)]
struct RecordFields {
    name: String,
    description: String,
    template: String,
}

impl TryFrom<RecordFields> for PromptRecord {
    type Error = AppError;

    fn try_from(fields: RecordFields) -> AppResult<Self> {
        Self::new(fields.name, fields.description, fields.template)
    }
}

impl PromptRecord {
    /// Create a record.
    ///
    /// Fails with `InvalidName` if `name` is empty or otherwise breaks the
    /// naming grammar, so every record can be used as a store key.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        template: impl Into<String>,
    ) -> AppResult<Self> {
        let name = name.into();
        validate_name(&name)?;

        Ok(Self {
            name,
            description: description.into(),
            template: template.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Same name and description, new template.
    pub fn with_template(&self, template: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            template: template.into(),
        }
    }

    /// Render the template with `values`.
    ///
    /// # Example
    /// ```
    /// use promptsy_prompt::PromptRecord;
    /// use std::collections::HashMap;
    ///
    /// let prompt = PromptRecord::new("hello_world", "An example prompt", "Hello, {name}!").unwrap();
    /// let values = HashMap::from([("name".to_string(), "Taylor Swift".to_string())]);
    /// assert_eq!(prompt.format(&values).unwrap(), "Hello, Taylor Swift!");
    /// ```
    pub fn format(&self, values: &HashMap<String, String>) -> AppResult<String> {
        template::render(&self.template, values)
    }

    /// Placeholder keys the template needs, in order of first appearance.
    pub fn placeholders(&self) -> Vec<String> {
        template::placeholders(&self.template)
    }

    /// `"{name}: {description}"`
    pub fn describe(&self) -> String {
        format!("{}: {}", self.name, self.description)
    }

    /// Structured form: `{name, description, template}`.
    pub fn to_document(&self) -> Value {
        let mut map = Mapping::new();
        map.insert("name".into(), self.name.clone().into());
        map.insert("description".into(), self.description.clone().into());
        map.insert("template".into(), self.template.clone().into());
        Value::Mapping(map)
    }

    /// Inverse of [`PromptRecord::to_document`].
    ///
    /// Fails with `MalformedRecord` when a field is missing, is not a
    /// string, or the name is invalid.
    pub fn from_document(document: &Value) -> AppResult<Self> {
        serde_yaml::from_value(document.clone())
            .map_err(|e| AppError::MalformedRecord(e.to_string()))
    }
}

impl fmt::Display for PromptRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)
    }
}

/// What a stored document holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredDocument {
    /// Bare template text (minimal variant).
    Raw(String),
    /// A full prompt record.
    Record(PromptRecord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DocumentKind {
    Raw,
    Record,
}

/// On-disk envelope. Legacy documents carry only `text`.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<DocumentKind>,
    text: Value,
}

impl StoredDocument {
    /// Serialize as a version-tagged YAML document.
    pub fn to_yaml(&self) -> AppResult<String> {
        let (kind, text) = match self {
            StoredDocument::Raw(text) => (DocumentKind::Raw, Value::String(text.clone())),
            StoredDocument::Record(record) => (DocumentKind::Record, record.to_document()),
        };

        let envelope = Envelope {
            version: Some(DOCUMENT_VERSION),
            kind: Some(kind),
            text,
        };

        Ok(serde_yaml::to_string(&envelope)?)
    }

    /// Parse a stored document, current or legacy.
    ///
    /// Versioned documents are decoded by their `kind`. Unversioned
    /// documents are decoded by the shape of `text`: a string is `Raw`,
    /// a mapping is `Record`.
    pub fn from_yaml(contents: &str) -> AppResult<Self> {
        let envelope: Envelope = serde_yaml::from_str(contents)
            .map_err(|e| AppError::MalformedRecord(format!("Invalid prompt document: {}", e)))?;

        match envelope.version {
            Some(DOCUMENT_VERSION) => match envelope.kind {
                Some(DocumentKind::Raw) => raw_text(envelope.text).map(StoredDocument::Raw),
                Some(DocumentKind::Record) => {
                    PromptRecord::from_document(&envelope.text).map(StoredDocument::Record)
                }
                None => Err(AppError::MalformedRecord(
                    "Versioned document is missing 'kind'".to_string(),
                )),
            },
            Some(other) => Err(AppError::MalformedRecord(format!(
                "Unsupported document version {} (expected {})",
                other, DOCUMENT_VERSION
            ))),
            None => match envelope.text {
                Value::String(text) => Ok(StoredDocument::Raw(text)),
                value @ Value::Mapping(_) => {
                    PromptRecord::from_document(&value).map(StoredDocument::Record)
                }
                _ => Err(AppError::MalformedRecord(
                    "Legacy document 'text' must be a string or a mapping".to_string(),
                )),
            },
        }
    }

    /// Turn the document into a record, naming raw text after `name`.
    pub fn into_record(self, name: &str) -> AppResult<PromptRecord> {
        match self {
            StoredDocument::Record(record) => Ok(record),
            StoredDocument::Raw(text) => PromptRecord::new(name, "", text),
        }
    }
}

fn raw_text(value: Value) -> AppResult<String> {
    match value {
        Value::String(text) => Ok(text),
        _ => Err(AppError::MalformedRecord(
            "Raw document 'text' must be a string".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello() -> PromptRecord {
        PromptRecord::new("test_prompt", "A test prompt", "Hello, {name}!").unwrap()
    }

    #[test]
    fn test_prompt_initialization() {
        let prompt = hello();
        assert_eq!(prompt.name(), "test_prompt");
        assert_eq!(prompt.description(), "A test prompt");
        assert_eq!(prompt.template(), "Hello, {name}!");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            PromptRecord::new("", "d", "t"),
            Err(AppError::InvalidName(_))
        ));
    }

    #[test]
    fn test_name_grammar_enforced_on_construction() {
        for name in ["bad..name", ".leading", "trailing.", "a/b", "ns.  "] {
            assert!(
                matches!(
                    PromptRecord::new(name, "d", "t"),
                    Err(AppError::InvalidName(_))
                ),
                "accepted {:?}",
                name
            );
        }
        assert!(PromptRecord::new("examples.hello_world", "d", "t").is_ok());
    }

    #[test]
    fn test_deserialize_validates_name() {
        let result: Result<PromptRecord, _> =
            serde_yaml::from_str("name: ''\ndescription: d\ntemplate: t\n");
        assert!(result.is_err());

        let result: Result<PromptRecord, _> =
            serde_yaml::from_str("name: bad..name\ndescription: d\ntemplate: t\n");
        assert!(result.is_err());

        let doc: Value =
            serde_yaml::from_str("name: bad..name\ndescription: d\ntemplate: t\n").unwrap();
        assert!(matches!(
            PromptRecord::from_document(&doc),
            Err(AppError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_describe_and_display() {
        let prompt = hello();
        assert_eq!(prompt.describe(), "test_prompt: A test prompt");
        assert_eq!(prompt.to_string(), prompt.describe());
    }

    #[test]
    fn test_format() {
        let values = HashMap::from([("name".to_string(), "John".to_string())]);
        assert_eq!(hello().format(&values).unwrap(), "Hello, John!");
        assert!(matches!(
            hello().format(&HashMap::new()),
            Err(AppError::MissingPlaceholderValue(_))
        ));
    }

    #[test]
    fn test_with_template_keeps_identity() {
        let updated = hello().with_template("Hi, {name}.");
        assert_eq!(updated.name(), "test_prompt");
        assert_eq!(updated.description(), "A test prompt");
        assert_eq!(updated.template(), "Hi, {name}.");
    }

    #[test]
    fn test_document_round_trip() {
        let prompt = PromptRecord::new(
            "examples.multi",
            "Multi-line: with colon",
            "# Title\n\n{text}\n  indented {{literal}}\n",
        )
        .unwrap();
        let restored = PromptRecord::from_document(&prompt.to_document()).unwrap();
        assert_eq!(restored, prompt);
    }

    #[test]
    fn test_from_document_missing_field() {
        let doc: Value = serde_yaml::from_str("name: x\ndescription: y\n").unwrap();
        assert!(matches!(
            PromptRecord::from_document(&doc),
            Err(AppError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_stored_document_yaml_is_versioned() {
        let yaml = StoredDocument::Record(hello()).to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("kind: record"));

        let parsed = StoredDocument::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, StoredDocument::Record(hello()));
    }

    #[test]
    fn test_raw_document_round_trip() {
        let doc = StoredDocument::Raw("Line one\n{placeholder}\n".to_string());
        let parsed = StoredDocument::from_yaml(&doc.to_yaml().unwrap()).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_legacy_documents() {
        let raw = StoredDocument::from_yaml("text: Hello, {name}!\n").unwrap();
        assert_eq!(raw, StoredDocument::Raw("Hello, {name}!".to_string()));

        let record = StoredDocument::from_yaml(
            "text:\n  name: test_prompt\n  description: A test prompt\n  template: Hello, {name}!\n",
        )
        .unwrap();
        assert_eq!(record, StoredDocument::Record(hello()));
    }

    #[test]
    fn test_unsupported_version() {
        let result = StoredDocument::from_yaml("version: 9\nkind: raw\ntext: hi\n");
        assert!(matches!(result, Err(AppError::MalformedRecord(_))));
    }

    #[test]
    fn test_raw_into_record() {
        let record = StoredDocument::Raw("Hi".to_string())
            .into_record("custom_prompt")
            .unwrap();
        assert_eq!(record.name(), "custom_prompt");
        assert_eq!(record.description(), "");
        assert_eq!(record.template(), "Hi");
    }
}
