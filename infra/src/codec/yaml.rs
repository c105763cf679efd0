use super::{DocumentFormat, FormatAdapter};
use crate::definition::value::{Number, Scalar};
use human_task_base::{error::HumanTaskError, limits::YAML_MAX_NESTING_DEPTH};
use serde_yaml::{Mapping, Value as YamlValue};

/// YAML backend over `serde_yaml::Value`.
///
/// Scalars are typed loosely: numbers and booleans are accepted where a plain string is
/// expected. Tagged nodes (`!tag value`) are read through their inner value and
/// non-string mapping keys are read as their text.
pub struct YamlAdapter;

fn untag(mut node: &YamlValue) -> &YamlValue {
    while let YamlValue::Tagged(tagged) = node {
        node = &tagged.value;
    }
    node
}

// containers on the deepest path, the outermost one counting as 1
fn nesting_depth(node: &YamlValue) -> usize {
    let mut max = 0;
    let mut stack = vec![(node, 1usize)];
    while let Some((n, depth)) = stack.pop() {
        match untag(n) {
            YamlValue::Sequence(items) => {
                max = max.max(depth);
                stack.extend(items.iter().map(|c| (c, depth + 1)));
            }
            YamlValue::Mapping(m) => {
                max = max.max(depth);
                stack.extend(m.values().map(|c| (c, depth + 1)));
            }
            _ => {}
        }
    }
    max
}

fn key_text(key: &YamlValue) -> String {
    match untag(key) {
        YamlValue::String(s) => s.clone(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl FormatAdapter for YamlAdapter {
    type Node = YamlValue;
    const FORMAT: DocumentFormat = DocumentFormat::Yaml;

    fn parse(text: &str) -> Result<YamlValue, HumanTaskError> {
        serde_yaml::from_str(text).map_err(HumanTaskError::from)
    }

    /// Fails for nodes nested deeper than the parser reads back.
    fn emit(node: &YamlValue, _pretty: bool) -> Result<String, HumanTaskError> {
        let depth = nesting_depth(node);
        if depth > YAML_MAX_NESTING_DEPTH {
            return Err(HumanTaskError::SerializeError(format!(
                "yaml: nesting depth {depth} exceeds {YAML_MAX_NESTING_DEPTH}"
            )));
        }
        serde_yaml::to_string(node).map_err(|e| HumanTaskError::SerializeError(format!("yaml: {e}")))
    }

    fn is_sequence(node: &YamlValue) -> bool {
        untag(node).is_sequence()
    }

    fn is_mapping(node: &YamlValue) -> bool {
        untag(node).is_mapping()
    }

    fn scalar(node: &YamlValue) -> Option<Scalar> {
        match untag(node) {
            YamlValue::Null => Some(Scalar::Null),
            YamlValue::Bool(b) => Some(Scalar::Bool(*b)),
            YamlValue::Number(n) => Some(Scalar::Number(yaml_number(n))),
            YamlValue::String(s) => Some(Scalar::String(s.clone())),
            _ => None,
        }
    }

    fn items(node: &YamlValue) -> Vec<&YamlValue> {
        match untag(node) {
            YamlValue::Sequence(s) => s.iter().collect(),
            _ => Vec::new(),
        }
    }

    fn entries(node: &YamlValue) -> Vec<(String, &YamlValue)> {
        match untag(node) {
            YamlValue::Mapping(m) => m.iter().map(|(k, v)| (key_text(k), v)).collect(),
            _ => Vec::new(),
        }
    }

    fn get<'a>(node: &'a YamlValue, key: &str) -> Option<&'a YamlValue> {
        match untag(node) {
            YamlValue::Mapping(m) => m.get(key),
            _ => None,
        }
    }

    fn coerce_str(node: &YamlValue) -> Option<String> {
        match untag(node) {
            YamlValue::String(s) => Some(s.clone()),
            YamlValue::Number(n) => Some(n.to_string()),
            YamlValue::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn coerce_bool(node: &YamlValue) -> Option<bool> {
        match untag(node) {
            YamlValue::Bool(b) => Some(*b),
            YamlValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn build_scalar(scalar: Scalar) -> YamlValue {
        match scalar {
            Scalar::Null => YamlValue::Null,
            Scalar::Bool(b) => YamlValue::Bool(b),
            Scalar::Number(Number::Int(i)) => YamlValue::Number(i.into()),
            Scalar::Number(Number::UInt(u)) => YamlValue::Number(u.into()),
            Scalar::Number(Number::Float(f)) => YamlValue::Number(f.into()),
            Scalar::String(s) => YamlValue::String(s),
        }
    }

    fn build_sequence(items: Vec<YamlValue>) -> YamlValue {
        YamlValue::Sequence(items)
    }

    fn build_mapping(entries: Vec<(String, YamlValue)>) -> YamlValue {
        let mut mapping = Mapping::with_capacity(entries.len());
        for (k, v) in entries {
            mapping.insert(YamlValue::String(k), v);
        }
        YamlValue::Mapping(mapping)
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Number {
    if let Some(i) = n.as_i64() {
        Number::Int(i)
    } else if let Some(u) = n.as_u64() {
        Number::UInt(u)
    } else {
        Number::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}
