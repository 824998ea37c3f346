//! Placeholder templates.
//!
//! Syntax:
//! - `{key}` is a placeholder; `key` is any text without `{` or `}`.
//! - `{{` and `}}` render a literal `{` and `}`.
//! - A `{` with no matching `}` before the next `{`, or a lone `}`,
//!   is kept as literal text.
//!
//! Substituted values are inserted verbatim and never re-scanned.

use promptsy_core::{AppError, AppResult};
use std::collections::HashMap;

/// A parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Split a template into literal and placeholder segments.
pub fn parse(template: &str) -> Vec<Segment<'_>> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    // Braces are ASCII, so every index we slice at is a char boundary.
    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                push_literal(&mut segments, &template[literal_start..i + 1]);
                i += 2;
                literal_start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                push_literal(&mut segments, &template[literal_start..i + 1]);
                i += 2;
                literal_start = i;
            }
            b'{' => match find_close(bytes, i + 1) {
                Some(close) => {
                    push_literal(&mut segments, &template[literal_start..i]);
                    segments.push(Segment::Placeholder(&template[i + 1..close]));
                    i = close + 1;
                    literal_start = i;
                }
                None => i += 1,
            },
            _ => i += 1,
        }
    }

    push_literal(&mut segments, &template[literal_start..]);
    segments
}

/// Index of the `}` closing a placeholder opened before `from`, unless
/// another `{` comes first.
fn find_close(bytes: &[u8], from: usize) -> Option<usize> {
    for (offset, byte) in bytes[from..].iter().enumerate() {
        match byte {
            b'}' => return Some(from + offset),
            b'{' => return None,
            _ => {}
        }
    }
    None
}

fn push_literal<'a>(segments: &mut Vec<Segment<'a>>, text: &'a str) {
    if !text.is_empty() {
        segments.push(Segment::Literal(text));
    }
}

/// Substitute every placeholder with its value.
///
/// Fails with `MissingPlaceholderValue` on the first placeholder that has
/// no entry in `values`. Unused entries are ignored.
pub fn render(template: &str, values: &HashMap<String, String>) -> AppResult<String> {
    let mut output = String::with_capacity(template.len());

    for segment in parse(template) {
        match segment {
            Segment::Literal(text) => output.push_str(text),
            Segment::Placeholder(key) => {
                let value = values
                    .get(key)
                    .ok_or_else(|| AppError::MissingPlaceholderValue(key.to_string()))?;
                output.push_str(value);
            }
        }
    }

    Ok(output)
}

/// Distinct placeholder keys in order of first appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for segment in parse(template) {
        if let Segment::Placeholder(key) = segment {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}
