use super::{DocumentFormat, FormatAdapter};
use crate::definition::value::{Number, Scalar};
use human_task_base::error::HumanTaskError;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// JSON backend over `serde_json::Value` (`preserve_order` keeps object key order).
///
/// Typing is strict: only JSON strings are accepted where a plain string is expected.
pub struct JsonAdapter;

impl FormatAdapter for JsonAdapter {
    type Node = JsonValue;
    const FORMAT: DocumentFormat = DocumentFormat::Json;

    // no recursion limit; serde_stacker grows the stack for deeply nested input
    fn parse(text: &str) -> Result<JsonValue, HumanTaskError> {
        let mut de = serde_json::Deserializer::from_str(text);
        de.disable_recursion_limit();
        let node = JsonValue::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(node)
    }

    fn emit(node: &JsonValue, pretty: bool) -> Result<String, HumanTaskError> {
        let text = if pretty {
            serde_json::to_string_pretty(node)
        } else {
            serde_json::to_string(node)
        };
        text.map_err(|e| HumanTaskError::SerializeError(format!("json: {e}")))
    }

    fn is_sequence(node: &JsonValue) -> bool {
        node.is_array()
    }

    fn is_mapping(node: &JsonValue) -> bool {
        node.is_object()
    }

    fn scalar(node: &JsonValue) -> Option<Scalar> {
        match node {
            JsonValue::Null => Some(Scalar::Null),
            JsonValue::Bool(b) => Some(Scalar::Bool(*b)),
            JsonValue::Number(n) => Some(Scalar::Number(json_number(n))),
            JsonValue::String(s) => Some(Scalar::String(s.clone())),
            JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }

    fn items(node: &JsonValue) -> Vec<&JsonValue> {
        match node {
            JsonValue::Array(a) => a.iter().collect(),
            _ => Vec::new(),
        }
    }

    fn entries(node: &JsonValue) -> Vec<(String, &JsonValue)> {
        match node {
            JsonValue::Object(o) => o.iter().map(|(k, v)| (k.clone(), v)).collect(),
            _ => Vec::new(),
        }
    }

    fn get<'a>(node: &'a JsonValue, key: &str) -> Option<&'a JsonValue> {
        node.as_object().and_then(|o| o.get(key))
    }

    fn coerce_str(node: &JsonValue) -> Option<String> {
        node.as_str().map(|s| s.to_string())
    }

    fn coerce_bool(node: &JsonValue) -> Option<bool> {
        node.as_bool()
    }

    fn build_scalar(scalar: Scalar) -> JsonValue {
        match scalar {
            Scalar::Null => JsonValue::Null,
            Scalar::Bool(b) => JsonValue::Bool(b),
            Scalar::Number(Number::Int(i)) => JsonValue::Number(i.into()),
            Scalar::Number(Number::UInt(u)) => JsonValue::Number(u.into()),
            Scalar::Number(Number::Float(f)) => match serde_json::Number::from_f64(f) {
                Some(n) => JsonValue::Number(n),
                None => {
                    tracing::warn!("json cannot carry non-finite number {}, written as null", f);
                    JsonValue::Null
                }
            },
            Scalar::String(s) => JsonValue::String(s),
        }
    }

    fn build_sequence(items: Vec<JsonValue>) -> JsonValue {
        JsonValue::Array(items)
    }

    fn build_mapping(entries: Vec<(String, JsonValue)>) -> JsonValue {
        JsonValue::Object(entries.into_iter().collect())
    }
}

fn json_number(n: &serde_json::Number) -> Number {
    if let Some(i) = n.as_i64() {
        Number::Int(i)
    } else if let Some(u) = n.as_u64() {
        Number::UInt(u)
    } else {
        Number::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_tests() {
        let node = json!({"a": [1, "x"], "b": null});
        assert!(JsonAdapter::is_mapping(&node));
        assert!(!JsonAdapter::is_scalar(&node));
        assert!(JsonAdapter::is_sequence(&node["a"]));
        assert!(JsonAdapter::is_null(&node["b"]));
        assert_eq!(JsonAdapter::items(&node["a"]).len(), 2);
        assert_eq!(
            JsonAdapter::entries(&node)
                .into_iter()
                .map(|(k, _)| k)
                .collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_strict_string_coercion() {
        assert_eq!(JsonAdapter::coerce_str(&json!("1.0")), Some("1.0".to_string()));
        assert_eq!(JsonAdapter::coerce_str(&json!(1.0)), None);
        assert_eq!(JsonAdapter::coerce_str(&json!(true)), None);
        assert_eq!(JsonAdapter::coerce_bool(&json!("true")), None);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            JsonAdapter::scalar(&json!(-3)),
            Some(Scalar::Number(Number::Int(-3)))
        );
        assert_eq!(
            JsonAdapter::scalar(&json!(u64::MAX)),
            Some(Scalar::Number(Number::UInt(u64::MAX)))
        );
        assert_eq!(
            JsonAdapter::scalar(&json!(1.5)),
            Some(Scalar::Number(Number::Float(1.5)))
        );
        assert_eq!(
            JsonAdapter::build_scalar(Scalar::Number(Number::Float(f64::INFINITY))),
            JsonValue::Null
        );
    }

    #[test]
    fn test_mapping_keeps_order() {
        let node = JsonAdapter::build_mapping(vec![
            ("z".to_string(), JsonAdapter::build_str("1")),
            ("a".to_string(), JsonAdapter::build_str("2")),
        ]);
        assert_eq!(JsonAdapter::emit(&node, false).unwrap(), r#"{"z":"1","a":"2"}"#);
        let parsed = JsonAdapter::parse(r#"{"z":1,"a":2}"#).unwrap();
        assert_eq!(JsonAdapter::emit(&parsed, false).unwrap(), r#"{"z":1,"a":2}"#);
    }
}
