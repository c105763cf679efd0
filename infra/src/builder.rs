//! Validating builders for definition documents.
//!
//! Setters consume the builder and hand it back; setters that validate return
//! `Result<Self, HumanTaskError>` so a bad argument fails at the call that supplied it.
//! Nested sections are assembled through closures receiving a fresh sub-builder.

use crate::definition::value::{Value, ValueHint};
use human_task_base::{error::HumanTaskError, limits::LANGUAGE_CODE_LENGTH};
use once_cell::sync::Lazy;
use regex::Regex;

pub mod behavior;
pub mod deadline;
pub mod form;
pub mod people;
pub mod task;

pub use behavior::{
    CompletionBehaviorDefinitionBuilder, OutcomeDefinitionBuilder, SubtaskDefinitionBuilder,
};
pub use deadline::{
    DeadlineDefinitionBuilder, EscalationDefinitionBuilder, NotificationDefinitionBuilder,
    ReassignmentDefinitionBuilder,
};
pub use form::{FormDefinitionBuilder, ViewDefinitionBuilder};
pub use people::{PeopleAssignmentsDefinitionBuilder, PeopleReferenceDefinitionBuilder};
pub use task::HumanTaskDefinitionBuilder;

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

// https://semver.org/#is-there-a-suggested-regular-expression-regex-to-check-a-semver-string
static SEMVER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
    )
    .expect("valid semver regex")
});

static LANGUAGE_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^[a-z]{{{LANGUAGE_CODE_LENGTH}}}$")).expect("valid language code regex")
});

/// Lowercase the value and collapse every run of other characters into one `-`.
pub fn slugify(argument: &str, value: &str) -> Result<String, HumanTaskError> {
    let lower = value.trim().to_lowercase();
    let slug = NON_SLUG_CHARS.replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        return Err(HumanTaskError::InvalidName {
            argument: argument.to_string(),
            value: value.to_string(),
        });
    }
    Ok(slug.to_string())
}

/// Slugify each dot-separated segment; empty segments are dropped.
pub fn slugify_namespace(argument: &str, value: &str) -> Result<String, HumanTaskError> {
    let segments = value
        .split('.')
        .filter(|s| !s.trim().is_empty())
        .map(|s| slugify(argument, s))
        .collect::<Result<Vec<_>, _>>()?;
    if segments.is_empty() {
        return Err(HumanTaskError::InvalidName {
            argument: argument.to_string(),
            value: value.to_string(),
        });
    }
    Ok(segments.join("."))
}

pub fn validate_semver(argument: &str, value: &str) -> Result<String, HumanTaskError> {
    if SEMVER.is_match(value.trim()) {
        Ok(value.trim().to_string())
    } else {
        Err(HumanTaskError::InvalidSemanticVersion {
            argument: argument.to_string(),
            value: value.to_string(),
        })
    }
}

pub fn validate_language_code(value: &str) -> Result<&str, HumanTaskError> {
    if LANGUAGE_CODE.is_match(value) {
        Ok(value)
    } else {
        Err(HumanTaskError::InvalidLanguageCode(value.to_string()))
    }
}

pub(crate) fn require_text(argument: &str, value: &str) -> Result<String, HumanTaskError> {
    if value.trim().is_empty() {
        Err(HumanTaskError::InvalidParameter(format!(
            "{argument} must not be empty"
        )))
    } else {
        Ok(value.to_string())
    }
}

/// Add a language entry, replacing a previous non-localized value with a fresh map.
pub(crate) fn localize(
    current: Option<Value>,
    language: &str,
    text: &str,
) -> Result<Value, HumanTaskError> {
    validate_language_code(language)?;
    let mut map = match current {
        Some(Value::Localized(m)) => m,
        _ => Default::default(),
    };
    map.insert(language.to_string(), Value::text(text));
    Ok(Value::Localized(map))
}

/// Content of a localized field: a mapping becomes a localized map whose keys must be
/// language codes. Other shapes are kept as structures.
pub(crate) fn localized_content(value: Value) -> Result<Value, HumanTaskError> {
    match value.into_structure() {
        Value::Mapping(map) => {
            for language in map.keys() {
                validate_language_code(language)?;
            }
            Ok(Value::Localized(map))
        }
        other => Ok(other),
    }
}

/// Structured field content from a JSON literal.
pub fn structure(json: &serde_json::Value) -> Value {
    crate::codec::decode_value::<crate::codec::JsonAdapter>(ValueHint::Structure, json)
}
