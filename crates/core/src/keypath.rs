//! Key path parsing and normalization

use std::fmt;

use serde_json::Value;

use crate::{KeyPathError, Result};

const DELIMITER: char = '.';
const ESCAPE: char = '\\';

/// A key path as supplied by a caller, before normalization
///
/// Either a dotted path string or a list of key paths that is flattened
/// left-to-right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPathSpec {
    /// Already-escaped dotted path string
    Path(String),
    /// Nested key paths joined with `.`
    List(Vec<KeyPathSpec>),
}

impl From<&str> for KeyPathSpec {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for KeyPathSpec {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<&String> for KeyPathSpec {
    fn from(path: &String) -> Self {
        Self::Path(path.clone())
    }
}

impl From<KeyPath> for KeyPathSpec {
    fn from(path: KeyPath) -> Self {
        Self::Path(path.0)
    }
}

impl From<&KeyPath> for KeyPathSpec {
    fn from(path: &KeyPath) -> Self {
        Self::Path(path.0.clone())
    }
}

impl<T: Into<KeyPathSpec>> From<Vec<T>> for KeyPathSpec {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<KeyPathSpec>, const N: usize> From<[T; N]> for KeyPathSpec {
    fn from(items: [T; N]) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<KeyPathSpec>> From<&[T]> for KeyPathSpec {
    fn from(items: &[T]) -> Self {
        Self::List(items.iter().cloned().map(Into::into).collect())
    }
}

impl TryFrom<&Value> for KeyPathSpec {
    type Error = KeyPathError;

    /// Accepts JSON strings and (nested) arrays of strings
    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(path) => Ok(Self::Path(path.clone())),
            Value::Array(items) => items
                .iter()
                .map(KeyPathSpec::try_from)
                .collect::<Result<Vec<_>>>()
                .map(Self::List),
            other => Err(KeyPathError::InvalidElement(json_kind(other).to_string())),
        }
    }
}

impl TryFrom<Value> for KeyPathSpec {
    type Error = KeyPathError;

    fn try_from(value: Value) -> Result<Self> {
        Self::try_from(&value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Canonical dotted key path
///
/// Segments are separated by `.`; a literal dot inside a segment is `\.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath(String);

impl KeyPath {
    /// Normalize a key path spec into its canonical dotted form
    ///
    /// Strings are taken as-is. Lists are flattened recursively and joined
    /// with `.`; an empty list anywhere in the tree is rejected.
    pub fn normalize(spec: impl Into<KeyPathSpec>) -> Result<Self> {
        match spec.into() {
            KeyPathSpec::Path(path) => Ok(Self(path)),
            list => {
                let mut parts = Vec::new();
                flatten(&list, &mut parts)?;
                Ok(Self(parts.join(".")))
            }
        }
    }

    /// Build a canonical path from raw (unescaped) segments
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let escaped: Vec<String> = segments
            .into_iter()
            .map(|s| Self::escape_segment(s.as_ref()))
            .collect();
        Self(escaped.join("."))
    }

    /// Escape literal dots in a raw segment
    pub fn escape_segment(raw: &str) -> String {
        raw.replace(DELIMITER, "\\.")
    }

    /// Split into raw segments, unescaping `\.`
    pub fn segments(&self) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = self.0.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                ESCAPE if chars.peek() == Some(&DELIMITER) => {
                    current.push(DELIMITER);
                    chars.next();
                }
                DELIMITER => segments.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        segments.push(current);

        segments
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn flatten(spec: &KeyPathSpec, parts: &mut Vec<String>) -> Result<()> {
    match spec {
        KeyPathSpec::Path(path) => parts.push(path.clone()),
        KeyPathSpec::List(items) => {
            if items.is_empty() {
                return Err(KeyPathError::EmptyList);
            }
            for item in items {
                flatten(item, parts)?;
            }
        }
    }
    Ok(())
}

impl From<&str> for KeyPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for KeyPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl AsRef<str> for KeyPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
