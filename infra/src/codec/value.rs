//! Structural decode and encode of polymorphic values.
//!
//! Both directions walk the tree with an explicit stack of open containers, so
//! nesting depth is bounded only by memory.

use super::FormatAdapter;
use crate::definition::expression::{is_expression, RuntimeExpression};
use crate::definition::value::{Scalar, Value, ValueHint};
use indexmap::IndexMap;

enum DecodeFrame<'a, N> {
    Sequence {
        pending: std::vec::IntoIter<&'a N>,
        done: Vec<Value>,
    },
    Mapping {
        pending: std::vec::IntoIter<(String, &'a N)>,
        key: Option<String>,
        done: IndexMap<String, Value>,
        localized: bool,
    },
}

impl<'a, N> DecodeFrame<'a, N> {
    fn next_child(&mut self) -> Option<&'a N> {
        match self {
            DecodeFrame::Sequence { pending, .. } => pending.next(),
            DecodeFrame::Mapping { pending, key, .. } => {
                let (k, child) = pending.next()?;
                *key = Some(k);
                Some(child)
            }
        }
    }

    fn accept(&mut self, value: Value) {
        match self {
            DecodeFrame::Sequence { done, .. } => done.push(value),
            DecodeFrame::Mapping { key, done, .. } => {
                done.insert(key.take().unwrap_or_default(), value);
            }
        }
    }

    fn finish(self) -> Value {
        match self {
            DecodeFrame::Sequence { done, .. } => Value::Sequence(done),
            DecodeFrame::Mapping {
                done, localized, ..
            } => {
                if localized {
                    Value::Localized(done)
                } else {
                    Value::Mapping(done)
                }
            }
        }
    }
}

fn classify(scalar: Scalar) -> Value {
    match scalar {
        Scalar::String(s) if is_expression(&s) => {
            Value::Expression(RuntimeExpression::new_unchecked(s))
        }
        other => Value::Scalar(other),
    }
}

// a leaf decodes immediately; a container is pushed and decoded child by child
fn open_node<'a, A: FormatAdapter>(
    node: &'a A::Node,
    localized: bool,
    stack: &mut Vec<DecodeFrame<'a, A::Node>>,
) -> Option<Value> {
    if A::is_sequence(node) {
        stack.push(DecodeFrame::Sequence {
            pending: A::items(node).into_iter(),
            done: Vec::new(),
        });
        None
    } else if A::is_mapping(node) {
        let entries = A::entries(node);
        let done = IndexMap::with_capacity(entries.len());
        stack.push(DecodeFrame::Mapping {
            pending: entries.into_iter(),
            key: None,
            done,
            localized,
        });
        None
    } else {
        Some(classify(A::scalar(node).unwrap_or(Scalar::Null)))
    }
}

/// Decode a native node into a polymorphic value.
///
/// Strings wrapped in `${` `}` become expressions. With `ValueHint::Localized` the
/// outermost mapping becomes a localized map; its keys are not validated here.
pub fn decode_value<A: FormatAdapter>(hint: ValueHint, node: &A::Node) -> Value {
    let mut stack: Vec<DecodeFrame<'_, A::Node>> = Vec::new();
    let mut completed = open_node::<A>(node, hint == ValueHint::Localized, &mut stack);
    while let Some(frame) = stack.last_mut() {
        if let Some(value) = completed.take() {
            frame.accept(value);
            continue;
        }
        match frame.next_child() {
            Some(child) => completed = open_node::<A>(child, false, &mut stack),
            None => completed = stack.pop().map(DecodeFrame::finish),
        }
    }
    completed.unwrap_or_default()
}

enum EncodeFrame<'v, N> {
    Sequence {
        pending: std::slice::Iter<'v, Value>,
        done: Vec<N>,
    },
    Mapping {
        pending: indexmap::map::Iter<'v, String, Value>,
        key: Option<String>,
        done: Vec<(String, N)>,
    },
}

impl<'v, N> EncodeFrame<'v, N> {
    fn next_child(&mut self) -> Option<&'v Value> {
        match self {
            EncodeFrame::Sequence { pending, .. } => pending.next(),
            EncodeFrame::Mapping { pending, key, .. } => {
                let (k, child) = pending.next()?;
                *key = Some(k.clone());
                Some(child)
            }
        }
    }

    fn accept(&mut self, node: N) {
        match self {
            EncodeFrame::Sequence { done, .. } => done.push(node),
            EncodeFrame::Mapping { key, done, .. } => {
                done.push((key.take().unwrap_or_default(), node))
            }
        }
    }
}

fn open_value<'v, A: FormatAdapter>(
    value: &'v Value,
    stack: &mut Vec<EncodeFrame<'v, A::Node>>,
) -> Option<A::Node> {
    match value {
        Value::Scalar(s) => Some(A::build_scalar(s.clone())),
        Value::Expression(e) => Some(A::build_str(e.as_str())),
        Value::Sequence(items) => {
            stack.push(EncodeFrame::Sequence {
                pending: items.iter(),
                done: Vec::with_capacity(items.len()),
            });
            None
        }
        Value::Mapping(m) | Value::Localized(m) => {
            stack.push(EncodeFrame::Mapping {
                pending: m.iter(),
                key: None,
                done: Vec::with_capacity(m.len()),
            });
            None
        }
    }
}

fn finish_frame<A: FormatAdapter>(frame: EncodeFrame<'_, A::Node>) -> A::Node {
    match frame {
        EncodeFrame::Sequence { done, .. } => A::build_sequence(done),
        EncodeFrame::Mapping { done, .. } => A::build_mapping(done),
    }
}

/// Encode a polymorphic value as a native node, keeping recorded mapping order.
pub fn encode_value<A: FormatAdapter>(value: &Value) -> A::Node {
    let mut stack: Vec<EncodeFrame<'_, A::Node>> = Vec::new();
    let mut completed = open_value::<A>(value, &mut stack);
    while let Some(frame) = stack.last_mut() {
        if let Some(node) = completed.take() {
            frame.accept(node);
            continue;
        }
        match frame.next_child() {
            Some(child) => completed = open_value::<A>(child, &mut stack),
            None => completed = stack.pop().map(finish_frame::<A>),
        }
    }
    completed.unwrap_or_else(|| A::build_scalar(Scalar::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{JsonAdapter, YamlAdapter};
    use crate::definition::value::Number;
    use human_task_base::{error::HumanTaskError, limits::YAML_MAX_NESTING_DEPTH};
    use serde_json::json;

    #[test]
    fn test_decode_classifies_leaves() {
        let node = json!({
            "fakeProperty": "fake-data",
            "expr": "${ $CONTEXT.form.data }",
            "n": 3,
            "f": 0.5,
            "b": false,
            "z": null,
            "list": ["a", "${ .b }", [1]]
        });
        let v = decode_value::<JsonAdapter>(ValueHint::Structure, &node);
        let m = v.as_mapping().unwrap();
        assert_eq!(
            m.keys().collect::<Vec<_>>(),
            vec!["fakeProperty", "expr", "n", "f", "b", "z", "list"]
        );
        assert_eq!(m["fakeProperty"], Value::Scalar(Scalar::String("fake-data".into())));
        assert_eq!(
            m["expr"].as_expression().map(|e| e.as_str()),
            Some("${ $CONTEXT.form.data }")
        );
        assert_eq!(m["n"], Value::Scalar(Scalar::Number(Number::Int(3))));
        assert_eq!(m["f"], Value::Scalar(Scalar::Number(Number::Float(0.5))));
        assert_eq!(m["b"], Value::from(false));
        assert!(m["z"].is_null());
        assert_eq!(
            m["list"],
            Value::Sequence(vec![
                Value::from("a"),
                Value::from("${ .b }"),
                Value::Sequence(vec![Value::from(1i64)])
            ])
        );
        assert_eq!(encode_value::<JsonAdapter>(&v), node);
    }

    #[test]
    fn test_localized_hint_applies_to_outer_mapping() {
        let node = json!({"en": "Review", "fr": {"short": "Revue"}});
        let v = decode_value::<JsonAdapter>(ValueHint::Localized, &node);
        let l = v.as_localized().unwrap();
        assert_eq!(l["en"], Value::from("Review"));
        assert!(l["fr"].as_mapping().is_some());

        let s = decode_value::<JsonAdapter>(ValueHint::Structure, &node);
        assert!(s.as_mapping().is_some());
        assert_ne!(v, s);

        // a plain string title is not forced into a map
        let plain = decode_value::<JsonAdapter>(ValueHint::Localized, &json!("Review"));
        assert_eq!(plain, Value::from("Review"));
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 2_000;
        let mut node = json!("${ .leaf }");
        for i in 0..depth {
            node = if i % 2 == 0 {
                json!([node])
            } else {
                json!({ "k": node })
            };
        }
        let v = decode_value::<JsonAdapter>(ValueHint::Structure, &node);
        assert_eq!(v.depth(), depth);

        // through text
        let text = JsonAdapter::emit(&encode_value::<JsonAdapter>(&v), false).unwrap();
        let parsed = JsonAdapter::parse(&text).unwrap();
        let back = decode_value::<JsonAdapter>(ValueHint::Structure, &parsed);
        assert_eq!(back.depth(), depth);
        assert_eq!(encode_value::<JsonAdapter>(&back), node);

        // in memory the YAML tree has no limit, but it cannot be written
        let encoded = encode_value::<YamlAdapter>(&v);
        assert_eq!(decode_value::<YamlAdapter>(ValueHint::Structure, &encoded).depth(), depth);
        assert!(matches!(
            YamlAdapter::emit(&encoded, true),
            Err(HumanTaskError::SerializeError(_))
        ));
    }

    fn nested(depth: usize) -> Value {
        let mut v = Value::from("leaf");
        for _ in 0..depth {
            v = Value::Sequence(vec![v]);
        }
        v
    }

    #[test]
    fn test_yaml_depth_limit() {
        let deepest = nested(YAML_MAX_NESTING_DEPTH);
        let text = YamlAdapter::emit(&encode_value::<YamlAdapter>(&deepest), true).unwrap();
        let parsed = YamlAdapter::parse(&text).unwrap();
        assert_eq!(decode_value::<YamlAdapter>(ValueHint::Structure, &parsed), deepest);

        let too_deep = encode_value::<YamlAdapter>(&nested(YAML_MAX_NESTING_DEPTH + 1));
        assert!(matches!(
            YamlAdapter::emit(&too_deep, true),
            Err(HumanTaskError::SerializeError(_))
        ));
    }

    #[test]
    fn test_yaml_round_trip() {
        let text = "a:\n  - 1\n  - two\n  - ${ .three }\nb:\n  c: 1.5\n  d: null\n";
        let node = YamlAdapter::parse(text).unwrap();
        let v = decode_value::<YamlAdapter>(ValueHint::Structure, &node);
        assert!(v.get("a").is_some());
        let re = encode_value::<YamlAdapter>(&v);
        assert_eq!(re, node);
        assert_eq!(decode_value::<YamlAdapter>(ValueHint::Structure, &re), v);
    }
}
