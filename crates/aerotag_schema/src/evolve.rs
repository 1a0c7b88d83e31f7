//! Schema evolution: diffing the tag registry against the latest schema
//! version and generating the next one.
//!
//! Versioning is strictly monotonic. The generator only ever produces
//! `latest + 1`; anything else is refused. A generated version declares
//! every currently known tag explicitly, while `additionalProperties` keeps
//! undeclared future tags syntactically permitted: a schema never rejects a
//! tag merely for being new, only for having a wrong type once declared.

use crate::document::{SchemaDocument, SCHEMA_TITLE, TAG_NAME_PATTERN};
use crate::registry::{TagRegistry, TagType};
use crate::store::{SchemaStore, StoreError};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from schema evolution.
#[derive(Debug, Error)]
pub enum EvolveError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("version {requested} is not the immediate successor of v{latest}")]
    Version { latest: u32, requested: u32 },
}

/// Result of a read-only [`plan`] run.
#[derive(Debug, Clone)]
pub enum EvolutionPlan {
    /// Every observed tag is already declared by the latest version.
    UpToDate { version: u32 },
    /// New tags were observed; `next_version` would declare them.
    UpdateNeeded {
        next_version: u32,
        new_tags: Vec<String>,
    },
}

/// Result of an [`apply`] run.
#[derive(Debug, Clone)]
pub enum EvolutionOutcome {
    /// Every observed tag is already declared; nothing was written.
    UpToDate { version: u32 },
    /// The next version was generated and persisted.
    Written {
        version: u32,
        path: PathBuf,
        new_tags: Vec<String>,
    },
}

/// Tags present in the registry but not declared by `schema`, in registry
/// (first-observed) order.
///
/// Pure: running it twice on the same pair yields the same list. A schema
/// without declared tag properties contributes nothing to filter against.
pub fn new_tags(registry: &TagRegistry, schema: &SchemaDocument) -> Vec<String> {
    registry
        .names()
        .filter(|name| !schema.declares_tag(name))
        .map(str::to_owned)
        .collect()
}

/// JSON-Schema type fragment for one inferred tag type.
///
/// Containers stay generic: arrays hold any scalar tag value, objects map
/// arbitrary keys to scalar tag values.
fn type_fragment(tag_type: TagType) -> Value {
    match tag_type {
        TagType::Array => json!({
            "type": "array",
            "items": { "$ref": "#/$defs/tagScalar" }
        }),
        TagType::Object => json!({
            "type": "object",
            "additionalProperties": { "$ref": "#/$defs/tagScalar" }
        }),
        scalar => json!({ "type": scalar.as_str() }),
    }
}

/// Generate the schema document for `target`, which must be the immediate
/// successor of `latest`.
///
/// The result is a structural copy of `base` (no aliasing with the stored
/// original) with the title stamped for the new version and the declared
/// tag properties replaced wholesale from the registry, sorted by tag name.
pub fn generate(
    base: &SchemaDocument,
    registry: &TagRegistry,
    latest: u32,
    target: u32,
) -> Result<SchemaDocument, EvolveError> {
    if target != latest + 1 {
        return Err(EvolveError::Version {
            latest,
            requested: target,
        });
    }

    let mut document = base.clone();
    document.value["title"] = Value::String(format!("{SCHEMA_TITLE} (v{target})"));

    let mut entries: Vec<(&str, TagType)> = registry.iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut properties = Map::new();
    for (name, tag_type) in entries {
        properties.insert(name.to_owned(), type_fragment(tag_type));
    }
    debug!(version = target, tags = properties.len(), "generated tag properties");

    document.value["properties"]["tags"] = json!({
        "type": "object",
        "description": "Community-defined tags. New tags can be added, but must use consistent types.",
        "propertyNames": {
            "type": "string",
            "pattern": TAG_NAME_PATTERN
        },
        "properties": properties,
        "additionalProperties": { "$ref": "#/$defs/tagValue" }
    });

    Ok(document)
}

/// Read-only check: does the corpus introduce tags the latest schema does
/// not declare?
pub fn plan(store: &SchemaStore, registry: &TagRegistry) -> Result<EvolutionPlan, EvolveError> {
    let latest = store.latest_version()?;
    let current = store.load(latest)?;
    let new = new_tags(registry, &current);
    if new.is_empty() {
        Ok(EvolutionPlan::UpToDate { version: latest })
    } else {
        Ok(EvolutionPlan::UpdateNeeded {
            next_version: latest + 1,
            new_tags: new,
        })
    }
}

/// Generate and persist the next version when new tags were observed.
pub fn apply(store: &SchemaStore, registry: &TagRegistry) -> Result<EvolutionOutcome, EvolveError> {
    let latest = store.latest_version()?;
    let current = store.load(latest)?;
    let new = new_tags(registry, &current);
    if new.is_empty() {
        return Ok(EvolutionOutcome::UpToDate { version: latest });
    }

    let target = latest + 1;
    let document = generate(&current, registry, latest, target)?;
    let path = store.persist(&document, target)?;
    info!(version = target, new_tags = new.len(), "schema version created");
    Ok(EvolutionOutcome::Written {
        version: target,
        path,
        new_tags: new,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Submission;
    use serde_json::json;

    fn base_schema() -> SchemaDocument {
        SchemaDocument::from_value(json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "title": "AeroTag Aircraft Community Submission (v1)",
            "type": "object",
            "properties": {
                "registration": {"type": "string"},
                "tags": {
                    "type": "object",
                    "propertyNames": {"type": "string", "pattern": TAG_NAME_PATTERN},
                    "properties": {},
                    "additionalProperties": {"$ref": "#/$defs/tagValue"}
                }
            },
            "$defs": {
                "tagScalar": {"type": ["string", "integer", "number", "boolean", "null"]},
                "tagValue": {
                    "anyOf": [
                        {"$ref": "#/$defs/tagScalar"},
                        {"type": "array", "items": {"$ref": "#/$defs/tagScalar"}},
                        {"type": "object", "additionalProperties": {"$ref": "#/$defs/tagScalar"}}
                    ]
                }
            }
        }))
    }

    fn registry() -> TagRegistry {
        TagRegistry::build(&[
            Submission::new(json!({"tags": {"engine_count": 2}})),
            Submission::new(json!({"tags": {"engine_count": 2, "paint_color": "red"}})),
        ])
    }

    #[test]
    fn test_new_tags_in_registry_order() {
        let diff = new_tags(&registry(), &base_schema());
        assert_eq!(diff, vec!["engine_count", "paint_color"]);
    }

    #[test]
    fn test_diffing_is_idempotent() {
        let registry = registry();
        let schema = base_schema();
        assert_eq!(new_tags(&registry, &schema), new_tags(&registry, &schema));
    }

    #[test]
    fn test_declared_tags_are_not_new() {
        let schema = generate(&base_schema(), &registry(), 1, 2).unwrap();
        assert!(new_tags(&registry(), &schema).is_empty());
    }

    #[test]
    fn test_generate_refuses_non_successor_versions() {
        let registry = registry();
        let base = base_schema();
        assert!(matches!(
            generate(&base, &registry, 1, 3),
            Err(EvolveError::Version { latest: 1, requested: 3 })
        ));
        assert!(matches!(
            generate(&base, &registry, 1, 1),
            Err(EvolveError::Version { .. })
        ));
    }

    #[test]
    fn test_generate_stamps_title() {
        let schema = generate(&base_schema(), &registry(), 1, 2).unwrap();
        assert_eq!(
            schema.title(),
            Some("AeroTag Aircraft Community Submission (v2)")
        );
    }

    #[test]
    fn test_generate_declares_inferred_types() {
        let schema = generate(&base_schema(), &registry(), 1, 2).unwrap();
        let props = schema.tag_properties().unwrap();
        assert_eq!(props["engine_count"], json!({"type": "integer"}));
        assert_eq!(props["paint_color"], json!({"type": "string"}));
    }

    #[test]
    fn test_container_tags_stay_generic() {
        let registry = TagRegistry::build(&[Submission::new(json!({
            "tags": {
                "liveries": ["retro", "standard"],
                "seat_map": {"economy": 150}
            }
        }))]);
        let schema = generate(&base_schema(), &registry, 1, 2).unwrap();
        let props = schema.tag_properties().unwrap();
        assert_eq!(
            props["liveries"],
            json!({"type": "array", "items": {"$ref": "#/$defs/tagScalar"}})
        );
        assert_eq!(
            props["seat_map"],
            json!({"type": "object", "additionalProperties": {"$ref": "#/$defs/tagScalar"}})
        );
    }

    #[test]
    fn test_properties_are_replaced_not_merged() {
        // The base declares a tag the corpus no longer observes
        let mut base_value = base_schema().into_value();
        base_value["properties"]["tags"]["properties"] =
            json!({"stale_tag": {"type": "string"}});
        let base = SchemaDocument::from_value(base_value);

        let schema = generate(&base, &registry(), 1, 2).unwrap();
        let props = schema.tag_properties().unwrap();
        assert!(!props.contains_key("stale_tag"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_generate_keeps_extensibility_keywords() {
        let schema = generate(&base_schema(), &registry(), 1, 2).unwrap();
        let tags = &schema.as_value()["properties"]["tags"];
        assert_eq!(tags["propertyNames"]["pattern"], json!(TAG_NAME_PATTERN));
        assert_eq!(
            tags["additionalProperties"],
            json!({"$ref": "#/$defs/tagValue"})
        );
    }

    #[test]
    fn test_generate_does_not_alias_the_base() {
        let base = base_schema();
        let generated = generate(&base, &registry(), 1, 2).unwrap();

        // The base document is untouched by generation
        assert_eq!(
            base.title(),
            Some("AeroTag Aircraft Community Submission (v1)")
        );
        assert!(base.tag_properties().unwrap().is_empty());
        assert_eq!(generated.tag_properties().unwrap().len(), 2);
    }
}
