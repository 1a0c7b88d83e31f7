//! Issue-body extraction for the submission intake form.
//!
//! Intake forms arrive as semi-structured text: section headers followed by
//! free-form content. Recovering the JSON payload is a best-effort layered
//! extraction, an ordered list of strategies where each layer is tried only
//! if the previous one found nothing. The extracted text is NOT validated
//! here; feed it to [`crate::validate::parse_and_validate`].

use regex::Regex;
use std::sync::LazyLock;

/// Sentinel an empty optional form field renders as.
const NO_RESPONSE: &str = "_No response_";

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"### Submission JSON\s*\n\s*```(?:json)?\s*\n([\s\S]*?)\n\s*```").unwrap()
});

static RAW_AFTER_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"### Submission JSON\s*\n\s*([\[{][\s\S]*?[\]}])\s*(?:\n###|\z)").unwrap()
});

static BRACKET_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[{][\s\S]*?[\]}]").unwrap());

static CONTRIBUTOR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"### Contributor Name\s*\n\s*(\S[^\n]*)").unwrap());

/// One extraction layer: returns the payload or defers to the next layer.
type Strategy = fn(&str) -> Option<String>;

/// The layered extraction policy, in order of preference.
const STRATEGIES: &[Strategy] = &[fenced_block, raw_after_header, bare_bracket_span];

/// Extract the raw JSON payload from an intake form body.
///
/// Tries each strategy in order with early return: a fenced code block
/// under the `### Submission JSON` header, then raw bracketed text under
/// that header, then a whole-body scan for the first bracketed span.
pub fn extract_submission_json(body: &str) -> Option<String> {
    STRATEGIES.iter().find_map(|strategy| strategy(body))
}

/// Fenced code block directly under the `### Submission JSON` header.
fn fenced_block(body: &str) -> Option<String> {
    FENCED_JSON
        .captures(body)
        .map(|caps| caps[1].trim().to_owned())
}

/// Raw bracket-delimited text under the header, up to the next section
/// header or end of text.
fn raw_after_header(body: &str) -> Option<String> {
    RAW_AFTER_HEADER
        .captures(body)
        .map(|caps| caps[1].trim().to_owned())
}

/// Last resort: the first balanced-looking span anywhere in the body whose
/// outer delimiters match (`{...}` or `[...]`).
fn bare_bracket_span(body: &str) -> Option<String> {
    BRACKET_SPAN.find_iter(body).find_map(|m| {
        let candidate = m.as_str().trim();
        let delimited = (candidate.starts_with('{') && candidate.ends_with('}'))
            || (candidate.starts_with('[') && candidate.ends_with(']'));
        delimited.then(|| candidate.to_owned())
    })
}

/// Extract the contributor name from the `### Contributor Name` section.
///
/// The `_No response_` sentinel an empty optional field renders as is
/// filtered to `None`.
pub fn extract_contributor_name(body: &str) -> Option<String> {
    let caps = CONTRIBUTOR_LINE.captures(body)?;
    let name = caps[1].trim();
    if name.is_empty() || name == NO_RESPONSE {
        None
    } else {
        Some(name.to_owned())
    }
}
