//! Typed values collected by a front end and handed to a converter

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::arguments::ArgumentType;

/// A single collected value, tagged by the kind of argument that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Content of a short string or multiline text argument
    Text(String),
    /// A boolean flag
    Flag(bool),
    /// An output file path
    Path(PathBuf),
}

impl Value {
    /// Whether this value is acceptable for an argument of the given type.
    pub fn fits(&self, kind: ArgumentType) -> bool {
        matches!(
            (self, kind),
            (Value::Text(_), ArgumentType::String | ArgumentType::Text)
                | (Value::Flag(_), ArgumentType::Flag)
                | (Value::Path(_), ArgumentType::FileSave)
        )
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Flag(_) => "flag",
            Value::Path(_) => "path",
        }
    }
}

/// Flat name → value map passed to `Converter::convert`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Values {
    entries: BTreeMap<String, Value>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.entries.insert(name.into(), value);
        self
    }

    /// Builder-style insert of a text value.
    pub fn with_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, Value::Text(text.into()));
        self
    }

    /// Builder-style insert of a set flag.
    pub fn with_flag(mut self, name: impl Into<String>) -> Self {
        self.insert(name, Value::Flag(true));
        self
    }

    /// Builder-style insert of a path.
    pub fn with_path(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.insert(name, Value::Path(path.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Text content for `name`, if present as text.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.entries.get(name) {
            Some(Value::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Whether the flag `name` is present and set.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(Value::Flag(true)))
    }

    /// Path for `name`, if present as a path.
    pub fn path(&self, name: &str) -> Option<&Path> {
        match self.entries.get(name) {
            Some(Value::Path(path)) => Some(path.as_path()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_respect_value_kind() {
        let values = Values::new()
            .with_text("to_ts", "2023-01-01T12:00:00+00:00")
            .with_flag("generate_csr")
            .with_path("export", "out.csv");

        assert_eq!(values.text("to_ts"), Some("2023-01-01T12:00:00+00:00"));
        assert!(values.flag("generate_csr"));
        assert_eq!(values.path("export"), Some(Path::new("out.csv")));

        // Wrong-kind lookups come back empty rather than coercing
        assert_eq!(values.text("generate_csr"), None);
        assert!(!values.flag("to_ts"));
        assert_eq!(values.path("to_ts"), None);
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn test_unset_flag_is_false() {
        let mut values = Values::new();
        values.insert("generate_csr", Value::Flag(false));
        assert!(!values.flag("generate_csr"));
        assert!(values.contains("generate_csr"));
    }

    #[test]
    fn test_value_fits_declared_type() {
        assert!(Value::Text("x".into()).fits(ArgumentType::String));
        assert!(Value::Text("x\ny".into()).fits(ArgumentType::Text));
        assert!(Value::Flag(true).fits(ArgumentType::Flag));
        assert!(Value::Path("a.csv".into()).fits(ArgumentType::FileSave));
        assert!(!Value::Flag(true).fits(ArgumentType::String));
        assert!(!Value::Text("a.csv".into()).fits(ArgumentType::FileSave));
    }
}
