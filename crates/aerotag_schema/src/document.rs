//! Versioned schema documents.
//!
//! A schema document is a full JSON Schema (draft 2020-12) describing one
//! community submission. Documents are immutable once persisted: a version
//! is never edited, only superseded by the next one.

use serde_json::{Map, Value};

/// Pattern every tag name must match, declared or not: a leading lowercase
/// letter followed by up to 63 lowercase alphanumerics or underscores.
pub const TAG_NAME_PATTERN: &str = "^[a-z][a-z0-9_]{0,63}$";

/// Title stem embedded in every generated schema version.
pub const SCHEMA_TITLE: &str = "AeroTag Aircraft Community Submission";

/// A JSON Schema-compatible document for one schema version.
///
/// The document is kept as a raw JSON tree rather than a typed struct: a
/// JSON Schema is open-shaped, and round-tripping it through a fixed struct
/// would drop keywords the engine does not interpret itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    pub(crate) value: Value,
}

impl SchemaDocument {
    /// Wrap a decoded schema document.
    pub fn from_value(value: Value) -> Self {
        Self { value }
    }

    /// The raw JSON tree.
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// The version-stamped document title.
    pub fn title(&self) -> Option<&str> {
        self.value.get("title").and_then(Value::as_str)
    }

    /// Declared tag properties (`properties.tags.properties`).
    ///
    /// A schema without the nested object simply declares no tags.
    pub fn tag_properties(&self) -> Option<&Map<String, Value>> {
        self.value
            .get("properties")?
            .get("tags")?
            .get("properties")?
            .as_object()
    }

    /// Whether `name` is explicitly declared as a tag.
    pub fn declares_tag(&self, name: &str) -> bool {
        self.tag_properties()
            .is_some_and(|props| props.contains_key(name))
    }

    /// Pretty-printed JSON with a trailing newline, the on-disk format.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        let mut out = serde_json::to_string_pretty(&self.value)?;
        out.push('\n');
        Ok(out)
    }
}
