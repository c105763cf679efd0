use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HumanTaskError {
    #[error("UnknownEnumTag({enum_name}: '{tag}')")]
    UnknownEnumTag { enum_name: &'static str, tag: String },
    #[error("MalformedDuration('{0}' is not an ISO 8601 duration)")]
    MalformedDuration(String),
    #[error("MalformedInstant('{0}' is not an ISO 8601 timestamp with offset)")]
    MalformedInstant(String),
    #[error("MissingRequiredField({0})")]
    MissingRequiredField(String),
    #[error("UnexpectedNodeKind({field}: expected {expected})")]
    UnexpectedNodeKind {
        field: String,
        expected: &'static str,
    },
    #[error("InvalidLanguageCode('{0}' is not a two-letter ISO 639-1 language code)")]
    InvalidLanguageCode(String),
    #[error(
        "InvalidExpressionFormat({argument}: '{value}' is not a valid runtime expression, or does not use the mandatory '${{ expression }}' format)"
    )]
    InvalidExpressionFormat { argument: String, value: String },
    #[error("InvalidSemanticVersion({argument}: '{value}' is not a valid semantic version)")]
    InvalidSemanticVersion { argument: String, value: String },
    #[error("InvalidName({argument}: '{value}' must contain lowercase alphanumerics or '-')")]
    InvalidName { argument: String, value: String },
    #[error("InvalidReference('{0}' is not a valid task definition reference)")]
    InvalidReference(String),
    #[error("InvalidParameter({0})")]
    InvalidParameter(String),
    #[error("DocumentTooLarge({size} bytes, max: {max} bytes)")]
    DocumentTooLarge { size: usize, max: usize },
    #[error("ParseError({0})")]
    ParseError(String),
    #[error("SerializeError({0})")]
    SerializeError(String),
}

impl HumanTaskError {
    /// Errors raised while validating builder arguments, as opposed to decode failures.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            HumanTaskError::InvalidLanguageCode(_)
                | HumanTaskError::InvalidExpressionFormat { .. }
                | HumanTaskError::InvalidSemanticVersion { .. }
                | HumanTaskError::InvalidName { .. }
                | HumanTaskError::InvalidParameter(_)
        )
    }
}

impl From<serde_json::Error> for HumanTaskError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() || e.is_eof() || e.is_syntax() {
            HumanTaskError::ParseError(format!("json: {e}"))
        } else {
            HumanTaskError::SerializeError(format!("json: {e}"))
        }
    }
}
impl From<serde_yaml::Error> for HumanTaskError {
    fn from(e: serde_yaml::Error) -> Self {
        HumanTaskError::ParseError(format!("yaml: {e}"))
    }
}
