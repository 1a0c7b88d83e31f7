//! Tag type inference and the corpus-wide tag registry.
//!
//! Contributors attach free-form key/value tags to submissions. Tag names
//! are never pre-declared, so the schema has to follow the data: every
//! observed tag value classifies as one of the seven JSON kinds, and the
//! registry folds that classification over the full corpus into a single
//! tag -> type mapping.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

/// A decoded community submission.
///
/// Submissions are immutable inputs; the engine never mutates them. The
/// registry only ever looks at the optional `tags` object, the structural
/// fields are checked separately by the validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission(Value);

impl Submission {
    /// Wrap a decoded JSON document.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The raw JSON document.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The `tags` object, if the submission carries one.
    pub fn tags(&self) -> Option<&Map<String, Value>> {
        self.0.get("tags").and_then(Value::as_object)
    }
}

impl From<Value> for Submission {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// The seven JSON kinds a tag value can classify as.
///
/// Integer-valued numbers classify as [`TagType::Integer`], not
/// [`TagType::Number`], preserving the stricter JSON-Schema type for tags
/// that have only ever held whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    String,
    Integer,
    Number,
    Boolean,
    Null,
    Array,
    Object,
}

impl TagType {
    /// Classify one observed tag value.
    ///
    /// Total: every JSON-representable value maps to exactly one kind.
    pub fn of(value: &Value) -> TagType {
        match value {
            Value::Null => TagType::Null,
            Value::Bool(_) => TagType::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => TagType::Integer,
            Value::Number(_) => TagType::Number,
            Value::String(_) => TagType::String,
            Value::Array(_) => TagType::Array,
            Value::Object(_) => TagType::Object,
        }
    }

    /// The JSON-Schema type name for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            TagType::String => "string",
            TagType::Integer => "integer",
            TagType::Number => "number",
            TagType::Boolean => "boolean",
            TagType::Null => "null",
            TagType::Array => "array",
            TagType::Object => "object",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tag observed with two different inferred types across the corpus.
///
/// The registry keeps the type of the earliest observation; the divergent
/// one is recorded here so the operator sees exactly which tag disagreed
/// and in which submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeConflict {
    /// Tag name that disagreed
    pub tag: String,
    /// Type kept by the registry (first observation)
    pub registered: TagType,
    /// Divergent type seen later
    pub observed: TagType,
    /// Index of the submission carrying the divergent value
    pub submission: usize,
}

impl fmt::Display for TypeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tag '{}' seen as {} in submission [{}] but registered as {}",
            self.tag, self.observed, self.submission, self.registered
        )
    }
}

/// Corpus-wide mapping from tag name to inferred type, in first-observed
/// order.
///
/// Invariant: every tag name present in any submission's `tags` object
/// appears exactly once, with the type of its earliest observation.
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    entries: Vec<(String, TagType)>,
    conflicts: Vec<TypeConflict>,
}

impl TagRegistry {
    /// Build the registry from the full submission corpus.
    ///
    /// Conflict policy: **first observation wins**. A tag keeps the type of
    /// its earliest observation; later disagreements are recorded on the
    /// registry and logged, never resolved by last-write-wins. An empty
    /// corpus yields an empty registry.
    pub fn build(submissions: &[Submission]) -> Self {
        let mut registry = TagRegistry::default();
        for (index, submission) in submissions.iter().enumerate() {
            let Some(tags) = submission.tags() else {
                continue;
            };
            for (name, value) in tags {
                let observed = TagType::of(value);
                match registry.get(name) {
                    None => registry.entries.push((name.clone(), observed)),
                    Some(registered) if registered != observed => {
                        warn!(
                            tag = %name,
                            submission = index,
                            registered = %registered,
                            observed = %observed,
                            "conflicting tag type, keeping first observation"
                        );
                        registry.conflicts.push(TypeConflict {
                            tag: name.clone(),
                            registered,
                            observed,
                            submission: index,
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        registry
    }

    /// The inferred type for `name`, if the tag was observed.
    pub fn get(&self, name: &str) -> Option<TagType> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|&(_, tag_type)| tag_type)
    }

    /// Tag names and types in first-observed order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TagType)> {
        self.entries
            .iter()
            .map(|(name, tag_type)| (name.as_str(), *tag_type))
    }

    /// Tag names in first-observed order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of distinct tags observed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Conflicts recorded while folding the corpus.
    pub fn conflicts(&self) -> &[TypeConflict] {
        &self.conflicts
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}
