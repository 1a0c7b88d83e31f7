//! Submission validation against a stored schema version.
//!
//! Thin layer over draft 2020-12 structural validation: type checks,
//! `propertyNames` patterns, `additionalProperties` enforcement and `$ref`
//! resolution all come from the `jsonschema` crate. Output is a list of
//! human-readable error strings; an empty list means everything validated.

use crate::document::SchemaDocument;
use crate::registry::Submission;
use serde_json::Value;
use thiserror::Error;

/// Errors from building a validator out of a schema document.
///
/// A malformed schema is a precondition violation by whoever produced the
/// document, not a property of the submissions being validated.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("schema is not a valid JSON Schema: {0}")]
    InvalidSchema(String),
}

/// Validate a batch of submissions against `schema`.
///
/// Error strings have the shape `"{index prefix}{dotted path or (root)}:
/// {message}"`. The `[i] ` index prefix appears only when the batch holds
/// more than one submission. Neither the schema nor the submissions are
/// mutated.
pub fn validate_submissions(
    submissions: &[Submission],
    schema: &SchemaDocument,
) -> Result<Vec<String>, ValidateError> {
    let validator = jsonschema::validator_for(schema.as_value())
        .map_err(|err| ValidateError::InvalidSchema(err.to_string()))?;

    let mut errors = Vec::new();
    for (index, submission) in submissions.iter().enumerate() {
        let prefix = if submissions.len() > 1 {
            format!("[{index}] ")
        } else {
            String::new()
        };
        for err in validator.iter_errors(submission.as_value()) {
            let path = dotted_path(&err.instance_path.to_string());
            errors.push(format!("{prefix}{path}: {err}"));
        }
    }
    Ok(errors)
}

/// Validate a single submission against `schema`.
pub fn validate_submission(
    submission: &Submission,
    schema: &SchemaDocument,
) -> Result<Vec<String>, ValidateError> {
    validate_submissions(std::slice::from_ref(submission), schema)
}

/// Parse a JSON payload and validate it only if parsing succeeds.
///
/// A parse failure yields no value and a single `"Invalid JSON: ..."` error
/// carrying the underlying parse message. A top-level array is treated as
/// a batch of submissions.
pub fn parse_and_validate(
    text: &str,
    schema: &SchemaDocument,
) -> Result<(Option<Value>, Vec<String>), ValidateError> {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => return Ok((None, vec![format!("Invalid JSON: {err}")])),
    };

    let errors = match &value {
        Value::Array(items) => {
            let batch: Vec<Submission> =
                items.iter().cloned().map(Submission::new).collect();
            validate_submissions(&batch, schema)?
        }
        _ => validate_submission(&Submission::new(value.clone()), schema)?,
    };
    Ok((Some(value), errors))
}

/// Render a JSON pointer as a dotted path, `(root)` for the document root.
fn dotted_path(pointer: &str) -> String {
    if pointer.is_empty() {
        "(root)".to_owned()
    } else {
        pointer.trim_start_matches('/').replace('/', ".")
    }
}
