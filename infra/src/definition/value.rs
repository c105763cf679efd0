use super::expression::{is_expression, RuntimeExpression};
use indexmap::IndexMap;
use std::fmt;

/// Number as given by the backend. `Int` and `UInt` holding the same integer compare equal.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::UInt(u) => u as f64,
            Number::Float(f) => f,
        }
    }
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Int(i) => Some(i),
            Number::UInt(u) => i64::try_from(u).ok(),
            Number::Float(_) => None,
        }
    }
    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Number::Float(a), Number::Float(b)) => a == b,
            (Number::Float(_), _) | (_, Number::Float(_)) => false,
            (Number::UInt(a), Number::UInt(b)) => a == b,
            (a, b) => a.as_i64().is_some() && a.as_i64() == b.as_i64(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::UInt(u) => write!(f, "{u}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

/// Whether untyped object data of a field is a generic structure or a localized map.
///
/// Only the outermost mapping of a field is affected; nested mappings are structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueHint {
    #[default]
    Structure,
    Localized,
}

pub type LocalizedMap = IndexMap<String, Value>;

/// Dynamically typed field value: literal scalar, runtime expression, nested structure or
/// language-keyed localized map.
///
/// Mappings keep insertion order for emission. Equality ignores mapping order.
///
/// Build strings with `Value::text` or `From<&str>` so that `${ }` text is classified as an
/// expression the same way decoding classifies it. A `Scalar::String` holding expression text
/// reads back as `Value::Expression`; `into_structure` repairs such values.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Expression(RuntimeExpression),
    Sequence(Vec<Value>),
    Mapping(IndexMap<String, Value>),
    Localized(LocalizedMap),
}

impl Value {
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    /// Classify text as an expression or a literal string.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if is_expression(&value) {
            Value::Expression(RuntimeExpression::new_unchecked(value))
        } else {
            Value::Scalar(Scalar::String(value))
        }
    }

    pub fn mapping<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn localized<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Localized(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, Value::Expression(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(Scalar::Null))
    }

    pub fn as_expression(&self) -> Option<&RuntimeExpression> {
        match self {
            Value::Expression(e) => Some(e),
            _ => None,
        }
    }

    /// literal string or expression text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            Value::Expression(e) => Some(e.as_str()),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_localized(&self) -> Option<&LocalizedMap> {
        match self {
            Value::Localized(m) => Some(m),
            _ => None,
        }
    }

    /// Localized entry for the language; a non-localized value applies to every language.
    pub fn in_language(&self, language: &str) -> Option<&Value> {
        match self {
            Value::Localized(m) => m.get(language),
            other => Some(other),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Mapping(m) | Value::Localized(m) => m.get(key),
            _ => None,
        }
    }

    /// The value as a structure field reads it back: localized maps at any depth become
    /// plain mappings and literal strings in `${ }` become expressions.
    pub fn into_structure(mut self) -> Value {
        let mut pending = vec![&mut self];
        while let Some(v) = pending.pop() {
            let replacement = match &mut *v {
                Value::Localized(m) => Some(Value::Mapping(std::mem::take(m))),
                Value::Scalar(Scalar::String(s)) if is_expression(s) => Some(Value::Expression(
                    RuntimeExpression::new_unchecked(std::mem::take(s)),
                )),
                _ => None,
            };
            if let Some(r) = replacement {
                *v = r;
            }
            match v {
                Value::Sequence(items) => pending.extend(items.iter_mut()),
                Value::Mapping(m) => pending.extend(m.values_mut()),
                _ => {}
            }
        }
        self
    }

    /// Depth of nested containers (scalars and expressions are 0)
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((v, d)) = stack.pop() {
            let children: Box<dyn Iterator<Item = &Value>> = match v {
                Value::Sequence(items) => Box::new(items.iter()),
                Value::Mapping(m) | Value::Localized(m) => Box::new(m.values()),
                _ => continue,
            };
            max = max.max(d + 1);
            stack.extend(children.map(|c| (c, d + 1)));
        }
        max
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::null()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::text(value)
    }
}
impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::text(value)
    }
}
impl From<RuntimeExpression> for Value {
    fn from(value: RuntimeExpression) -> Self {
        Value::Expression(value)
    }
}
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Scalar(Scalar::Bool(value))
    }
}
impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Scalar(Scalar::Number(Number::Int(value)))
    }
}
impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Scalar(Scalar::Number(Number::UInt(value)))
    }
}
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(Scalar::Number(Number::Float(value)))
    }
}
impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Sequence(value)
    }
}
