//! Hierarchical prompt names.
//!
//! A name is a dot-separated list of segments. All segments but the last
//! form a directory path; the last is the file stem. A single-segment name
//! lives under the implicit `custom` directory:
//!
//! | name                   | relative path          |
//! |------------------------|------------------------|
//! | `custom_prompt`        | `custom/custom_prompt` |
//! | `examples.hello_world` | `examples/hello_world` |
//! | `a.b.c`                | `a/b/c`                |
//!
//! Nothing here touches the filesystem.

use promptsy_core::{AppError, AppResult};
use std::path::{Component, Path, PathBuf};

/// Directory for names with a single segment.
pub const DEFAULT_NAMESPACE: &str = "custom";

/// File extension of stored documents.
pub const DOCUMENT_EXTENSION: &str = "yaml";

/// Check a name against the grammar.
///
/// Rejected with `InvalidName`: empty names, empty segments (leading,
/// trailing or doubled dots), blank segments, and segments containing a
/// path separator.
pub fn validate_name(name: &str) -> AppResult<()> {
    if name.is_empty() {
        return Err(AppError::InvalidName("name is empty".to_string()));
    }

    for segment in name.split('.') {
        if segment.is_empty() {
            return Err(AppError::InvalidName(format!(
                "'{}' has an empty segment",
                name
            )));
        }
        if segment.trim().is_empty() {
            return Err(AppError::InvalidName(format!(
                "'{}' has a blank segment",
                name
            )));
        }
        if segment.contains(&['/', '\\'][..]) {
            return Err(AppError::InvalidName(format!(
                "'{}' contains a path separator",
                name
            )));
        }
    }

    Ok(())
}

/// Relative storage path for a name, without extension.
pub fn name_to_path(name: &str) -> AppResult<PathBuf> {
    validate_name(name)?;

    let segments: Vec<&str> = name.split('.').collect();
    let mut path = PathBuf::new();

    if segments.len() == 1 {
        path.push(DEFAULT_NAMESPACE);
    }
    for segment in segments {
        path.push(segment);
    }

    Ok(path)
}

/// Name for a document path relative to the store root.
///
/// Returns `None` for paths that are not `.yaml` documents or whose
/// components cannot form a valid name.
pub fn path_to_name(relative: &Path) -> Option<String> {
    if relative.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXTENSION) {
        return None;
    }

    let stem_path = relative.with_extension("");
    let mut segments = Vec::new();

    for component in stem_path.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str()?;
                // A dotted file or directory name has no name mapping to it
                if part.contains('.') {
                    return None;
                }
                segments.push(part.to_string());
            }
            _ => return None,
        }
    }

    let name = segments.join(".");
    validate_name(&name).ok()?;
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_segment_uses_custom() {
        assert_eq!(
            name_to_path("custom_prompt").unwrap(),
            Path::new("custom").join("custom_prompt")
        );
    }

    #[test]
    fn test_nested_names() {
        assert_eq!(
            name_to_path("examples.hello_world").unwrap(),
            Path::new("examples").join("hello_world")
        );
        assert_eq!(
            name_to_path("a.b.c").unwrap(),
            Path::new("a").join("b").join("c")
        );
    }

    #[test]
    fn test_malformed_names_rejected() {
        for name in ["", ".", "a.", ".a", "a..b", "a. .b", "a/b", "a.b\\c"] {
            assert!(
                matches!(name_to_path(name), Err(AppError::InvalidName(_))),
                "expected '{}' to be rejected",
                name
            );
        }
    }

    #[test]
    fn test_path_to_name() {
        let path = Path::new("examples").join("hello_world.yaml");
        assert_eq!(path_to_name(&path), Some("examples.hello_world".to_string()));

        let path = Path::new("custom").join("custom_prompt.yaml");
        assert_eq!(path_to_name(&path), Some("custom.custom_prompt".to_string()));
    }

    #[test]
    fn test_path_to_name_skips_other_files() {
        assert_eq!(path_to_name(Path::new("notes.txt")), None);
        assert_eq!(path_to_name(Path::new("examples/hello.yml")), None);
        assert_eq!(path_to_name(Path::new("dir/a.b.yaml")), None);
    }

    #[test]
    fn test_nested_names_round_trip() {
        for name in ["examples.hello_world", "a.b.c", "custom.greeting"] {
            let mut path = name_to_path(name).unwrap();
            path.set_extension(DOCUMENT_EXTENSION);
            assert_eq!(path_to_name(&path).as_deref(), Some(name));
        }
    }
}
