use human_task_base::error::HumanTaskError;
use std::fmt;

pub const EXPRESSION_START: &str = "${";
pub const EXPRESSION_END: &str = "}";

/// true iff the whitespace-trimmed value is wrapped in `${` ... `}`
pub fn is_expression(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.starts_with(EXPRESSION_START) && trimmed.ends_with(EXPRESSION_END)
}

/// Validate an optional expression-typed argument: blank is accepted (absent), anything else
/// must be a runtime expression.
pub fn validate_optional_expression(
    argument: &str,
    value: Option<&str>,
) -> Result<Option<RuntimeExpression>, HumanTaskError> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Ok(None),
        Some(v) => RuntimeExpression::new(argument, v).map(Some),
    }
}

/// A string recognized as a runtime expression. The literal text is kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuntimeExpression(String);

impl RuntimeExpression {
    pub fn new(argument: &str, value: impl Into<String>) -> Result<Self, HumanTaskError> {
        let value = value.into();
        if is_expression(&value) {
            Ok(Self(value))
        } else {
            Err(HumanTaskError::InvalidExpressionFormat {
                argument: argument.to_string(),
                value,
            })
        }
    }
    // caller has already classified the text
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self(value)
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    /// expression body between the delimiters
    pub fn inner(&self) -> &str {
        let trimmed = self.0.trim();
        trimmed[EXPRESSION_START.len()..trimmed.len() - EXPRESSION_END.len()].trim()
    }
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RuntimeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
impl AsRef<str> for RuntimeExpression {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_expression() {
        assert!(is_expression("${x}"));
        assert!(is_expression("${ $CONTEXT.form.data }"));
        assert!(is_expression("  ${ .key | @text }\n"));
        assert!(is_expression("${}"));
        assert!(!is_expression("$ {x}"));
        assert!(!is_expression(""));
        assert!(!is_expression("   "));
        assert!(!is_expression("key"));
        assert!(!is_expression("${unterminated"));
        assert!(!is_expression("{x}"));
        assert!(!is_expression("$"));
    }

    #[test]
    fn test_trim_invariance() {
        for s in ["${a}", " ${a} ", "\t${a}", "a", " $ {a}", "", " ", "${a} b"] {
            assert_eq!(is_expression(s), is_expression(s.trim()), "input: {s:?}");
        }
    }

    #[test]
    fn test_runtime_expression() {
        let expr = RuntimeExpression::new("key", " ${ .id } ").unwrap();
        assert_eq!(expr.as_str(), " ${ .id } ");
        assert_eq!(expr.inner(), ".id");
        assert_eq!(expr.to_string(), " ${ .id } ");

        let err = RuntimeExpression::new("key", ".id").unwrap_err();
        assert_eq!(
            err,
            HumanTaskError::InvalidExpressionFormat {
                argument: "key".to_string(),
                value: ".id".to_string()
            }
        );
    }

    #[test]
    fn test_validate_optional_expression() {
        assert_eq!(validate_optional_expression("condition", None), Ok(None));
        assert_eq!(validate_optional_expression("condition", Some("  ")), Ok(None));
        assert!(validate_optional_expression("condition", Some("${ .ok }"))
            .unwrap()
            .is_some());
        assert!(validate_optional_expression("condition", Some("ok")).is_err());
    }
}
