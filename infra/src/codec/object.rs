//! Field accessors shared by the document codecs.
//!
//! `ObjectReader` reads named fields of a mapping node and reports failures with the
//! field's JSON pointer. `ObjectWriter` collects fields in call order and applies the
//! omission rules: absent optionals, empty optional lists and maps, and defaulted
//! fields marked as such are left out.

use super::document::NodeCodec;
use super::value::{decode_value, encode_value};
use super::{FieldPath, FormatAdapter};
use crate::definition::enums::{FlagSet, WireEnum, WireFlag};
use crate::definition::expression::{is_expression, RuntimeExpression};
use crate::definition::reference::TaskDefinitionReference;
use crate::definition::time::{
    decode_duration, decode_instant, encode_duration, encode_instant, Instant, IsoDuration,
};
use crate::definition::value::{Scalar, Value, ValueHint};
use human_task_base::error::HumanTaskError;
use indexmap::IndexMap;

pub struct ObjectReader<'a, 'p, A: FormatAdapter> {
    node: &'a A::Node,
    path: &'p mut FieldPath,
}

impl<'a, 'p, A: FormatAdapter> ObjectReader<'a, 'p, A> {
    pub fn new(node: &'a A::Node, path: &'p mut FieldPath) -> Result<Self, HumanTaskError> {
        if !A::is_mapping(node) {
            return Err(HumanTaskError::UnexpectedNodeKind {
                field: path.to_string(),
                expected: "mapping",
            });
        }
        Ok(Self { node, path })
    }

    /// field node of a typed field; an explicit null reads as absent
    pub fn field(&self, name: &str) -> Option<&'a A::Node> {
        A::get(self.node, name).filter(|n| !A::is_null(n))
    }

    fn missing(&self, name: &str) -> HumanTaskError {
        HumanTaskError::MissingRequiredField(self.path.child(name))
    }

    fn unexpected(&self, name: &str, expected: &'static str) -> HumanTaskError {
        HumanTaskError::UnexpectedNodeKind {
            field: self.path.child(name),
            expected,
        }
    }

    pub fn optional_str(&self, name: &str) -> Result<Option<String>, HumanTaskError> {
        match self.field(name) {
            None => Ok(None),
            Some(n) => A::coerce_str(n)
                .map(Some)
                .ok_or_else(|| self.unexpected(name, "string")),
        }
    }

    pub fn required_str(&self, name: &str) -> Result<String, HumanTaskError> {
        self.optional_str(name)?.ok_or_else(|| self.missing(name))
    }

    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool, HumanTaskError> {
        match self.field(name) {
            None => Ok(default),
            Some(n) => A::coerce_bool(n).ok_or_else(|| self.unexpected(name, "boolean")),
        }
    }

    /// blank tags read as absent
    pub fn optional_enum<E: WireEnum>(&self, name: &str) -> Result<Option<E>, HumanTaskError> {
        match self.optional_str(name)? {
            Some(tag) if !tag.trim().is_empty() => E::decode_tag(&tag).map(Some),
            _ => Ok(None),
        }
    }

    pub fn enum_or<E: WireEnum>(&self, name: &str, default: E) -> Result<E, HumanTaskError> {
        Ok(self.optional_enum(name)?.unwrap_or(default))
    }

    pub fn required_enum<E: WireEnum>(&self, name: &str) -> Result<E, HumanTaskError> {
        self.optional_enum(name)?.ok_or_else(|| self.missing(name))
    }

    /// Flags from a single tag, a comma separated list or a sequence of tags.
    pub fn flags_or<E: WireFlag>(
        &self,
        name: &str,
        default: FlagSet<E>,
    ) -> Result<FlagSet<E>, HumanTaskError> {
        let Some(n) = self.field(name) else {
            return Ok(default);
        };
        let tags = if A::is_sequence(n) {
            A::items(n)
                .into_iter()
                .map(|item| A::coerce_str(item).ok_or_else(|| self.unexpected(name, "string")))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            vec![A::coerce_str(n).ok_or_else(|| self.unexpected(name, "string or sequence"))?]
        };
        FlagSet::decode_tags(tags.iter().map(String::as_str))
    }

    pub fn optional_duration(&self, name: &str) -> Result<Option<IsoDuration>, HumanTaskError> {
        match self.optional_str(name)? {
            Some(s) => decode_duration(&s),
            None => Ok(None),
        }
    }

    pub fn optional_instant(&self, name: &str) -> Result<Option<Instant>, HumanTaskError> {
        match self.optional_str(name)? {
            Some(s) => decode_instant(&s),
            None => Ok(None),
        }
    }

    /// blank reads as absent; any other non-expression is rejected
    pub fn optional_expression(
        &self,
        name: &str,
    ) -> Result<Option<RuntimeExpression>, HumanTaskError> {
        match self.optional_str(name)? {
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) if is_expression(&s) => Ok(Some(RuntimeExpression::new_unchecked(s))),
            Some(s) => Err(HumanTaskError::InvalidExpressionFormat {
                argument: self.path.child(name),
                value: s,
            }),
            None => Ok(None),
        }
    }

    /// An explicit null is a null scalar here, not an absent field.
    pub fn optional_value(&self, name: &str, hint: ValueHint) -> Option<Value> {
        A::get(self.node, name).map(|n| decode_value::<A>(hint, n))
    }

    pub fn required_value(&self, name: &str, hint: ValueHint) -> Result<Value, HumanTaskError> {
        self.optional_value(name, hint)
            .ok_or_else(|| self.missing(name))
    }

    pub fn required_reference(
        &self,
        name: &str,
    ) -> Result<TaskDefinitionReference, HumanTaskError> {
        TaskDefinitionReference::parse(&self.required_str(name)?)
    }

    pub fn string_map(&self, name: &str) -> Result<IndexMap<String, String>, HumanTaskError> {
        let Some(n) = self.field(name) else {
            return Ok(IndexMap::new());
        };
        if !A::is_mapping(n) {
            return Err(self.unexpected(name, "mapping"));
        }
        A::entries(n)
            .into_iter()
            .map(|(k, v)| {
                A::coerce_str(v)
                    .map(|s| (k.clone(), s))
                    .ok_or_else(|| HumanTaskError::UnexpectedNodeKind {
                        field: format!("{}/{}", self.path.child(name), k),
                        expected: "string",
                    })
            })
            .collect()
    }

    pub fn optional_document<T: NodeCodec>(
        &mut self,
        name: &str,
    ) -> Result<Option<T>, HumanTaskError> {
        let Some(n) = self.field(name) else {
            return Ok(None);
        };
        self.path.push(name);
        let res = T::decode::<A>(n, self.path);
        self.path.pop();
        res.map(Some)
    }

    pub fn required_document<T: NodeCodec>(&mut self, name: &str) -> Result<T, HumanTaskError> {
        self.optional_document(name)?.ok_or_else(|| self.missing(name))
    }

    /// absent reads as an empty list
    pub fn list<T: NodeCodec>(&mut self, name: &str) -> Result<Vec<T>, HumanTaskError> {
        match self.field(name) {
            None => Ok(Vec::new()),
            Some(n) => self.decode_items(name, n),
        }
    }

    pub fn required_list<T: NodeCodec>(&mut self, name: &str) -> Result<Vec<T>, HumanTaskError> {
        match self.field(name) {
            None => Err(self.missing(name)),
            Some(n) => self.decode_items(name, n),
        }
    }

    fn decode_items<T: NodeCodec>(
        &mut self,
        name: &str,
        node: &'a A::Node,
    ) -> Result<Vec<T>, HumanTaskError> {
        if !A::is_sequence(node) {
            return Err(self.unexpected(name, "sequence"));
        }
        self.path.push(name);
        let mut decoded = Vec::new();
        let mut res = Ok(());
        for (idx, item) in A::items(node).into_iter().enumerate() {
            self.path.push_idx(idx);
            let item = T::decode::<A>(item, self.path);
            self.path.pop();
            match item {
                Ok(v) => decoded.push(v),
                Err(e) => {
                    res = Err(e);
                    break;
                }
            }
        }
        self.path.pop();
        res.map(|_| decoded)
    }
}

pub struct ObjectWriter<A: FormatAdapter> {
    entries: Vec<(String, A::Node)>,
}

impl<A: FormatAdapter> Default for ObjectWriter<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: FormatAdapter> ObjectWriter<A> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn node(&mut self, name: &str, node: A::Node) -> &mut Self {
        self.entries.push((name.to_string(), node));
        self
    }

    pub fn str(&mut self, name: &str, value: &str) -> &mut Self {
        self.node(name, A::build_str(value))
    }

    pub fn optional_str(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) => self.str(name, v),
            None => self,
        }
    }

    pub fn bool_unless(&mut self, name: &str, value: bool, default: bool) -> &mut Self {
        if value == default {
            return self;
        }
        self.node(name, A::build_scalar(Scalar::Bool(value)))
    }

    pub fn enum_tag<E: WireEnum>(&mut self, name: &str, value: E) -> &mut Self {
        self.str(name, value.tag())
    }

    pub fn enum_unless<E: WireEnum>(&mut self, name: &str, value: E, default: E) -> &mut Self {
        if value == default {
            return self;
        }
        self.enum_tag(name, value)
    }

    pub fn optional_enum<E: WireEnum>(&mut self, name: &str, value: Option<E>) -> &mut Self {
        match value {
            Some(v) => self.enum_tag(name, v),
            None => self,
        }
    }

    /// A single tag is written as a scalar, several as a sequence.
    pub fn flags_unless<E: WireFlag>(
        &mut self,
        name: &str,
        value: FlagSet<E>,
        default: FlagSet<E>,
    ) -> &mut Self {
        if value == default {
            return self;
        }
        let tags = value.encode_tags();
        let node = match tags.as_slice() {
            [single] => A::build_str(single),
            _ => A::build_sequence(tags.iter().map(|t| A::build_str(t)).collect()),
        };
        self.node(name, node)
    }

    pub fn optional_duration(&mut self, name: &str, value: Option<&IsoDuration>) -> &mut Self {
        match value {
            Some(d) => self.str(name, &encode_duration(d)),
            None => self,
        }
    }

    pub fn optional_instant(&mut self, name: &str, value: Option<&Instant>) -> &mut Self {
        match value {
            Some(i) => self.str(name, &encode_instant(i)),
            None => self,
        }
    }

    pub fn optional_expression(
        &mut self,
        name: &str,
        value: Option<&RuntimeExpression>,
    ) -> &mut Self {
        self.optional_str(name, value.map(|e| e.as_str()))
    }

    pub fn value(&mut self, name: &str, value: &Value) -> &mut Self {
        self.node(name, encode_value::<A>(value))
    }

    pub fn optional_value(&mut self, name: &str, value: Option<&Value>) -> &mut Self {
        match value {
            Some(v) => self.value(name, v),
            None => self,
        }
    }

    pub fn reference(&mut self, name: &str, value: &TaskDefinitionReference) -> &mut Self {
        self.str(name, &value.to_string())
    }

    pub fn string_map(&mut self, name: &str, value: &IndexMap<String, String>) -> &mut Self {
        if value.is_empty() {
            return self;
        }
        let node = A::build_mapping(
            value
                .iter()
                .map(|(k, v)| (k.clone(), A::build_str(v)))
                .collect(),
        );
        self.node(name, node)
    }

    pub fn document<T: NodeCodec>(&mut self, name: &str, value: &T) -> &mut Self {
        self.node(name, value.encode::<A>())
    }

    pub fn optional_document<T: NodeCodec>(&mut self, name: &str, value: Option<&T>) -> &mut Self {
        match value {
            Some(v) => self.document(name, v),
            None => self,
        }
    }

    /// omitted when empty
    pub fn list<T: NodeCodec>(&mut self, name: &str, values: &[T]) -> &mut Self {
        if values.is_empty() {
            return self;
        }
        self.required_list(name, values)
    }

    /// written even when empty so that it reads back
    pub fn required_list<T: NodeCodec>(&mut self, name: &str, values: &[T]) -> &mut Self {
        let node = A::build_sequence(values.iter().map(|v| v.encode::<A>()).collect());
        self.node(name, node)
    }

    pub fn finish(&mut self) -> A::Node {
        A::build_mapping(std::mem::take(&mut self.entries))
    }
}
