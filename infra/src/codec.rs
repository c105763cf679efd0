use crate::definition::task::HumanTaskDefinition;
use crate::definition::value::Scalar;
use human_task_base::{codec_config::CodecConfig, error::HumanTaskError};
use std::{fmt, str::FromStr};

pub mod document;
pub mod json;
pub mod object;
pub mod position;
pub mod value;
pub mod yaml;

pub use document::NodeCodec;
pub use json::JsonAdapter;
pub use position::FieldPath;
pub use value::{decode_value, encode_value};
pub use yaml::YamlAdapter;

/// Bridge between a serialization backend's native tree and the codec.
///
/// Only mechanical access lives here; shape decisions belong to the value and
/// document codecs.
pub trait FormatAdapter {
    type Node: Clone + fmt::Debug;
    const FORMAT: DocumentFormat;

    fn parse(text: &str) -> Result<Self::Node, HumanTaskError>;
    fn emit(node: &Self::Node, pretty: bool) -> Result<String, HumanTaskError>;

    fn is_sequence(node: &Self::Node) -> bool;
    fn is_mapping(node: &Self::Node) -> bool;
    fn is_scalar(node: &Self::Node) -> bool {
        !Self::is_sequence(node) && !Self::is_mapping(node)
    }
    fn is_null(node: &Self::Node) -> bool {
        matches!(Self::scalar(node), Some(Scalar::Null))
    }

    /// primitive value of a scalar node, typed as the backend gives it
    fn scalar(node: &Self::Node) -> Option<Scalar>;
    /// elements of a sequence node (empty for other nodes)
    fn items(node: &Self::Node) -> Vec<&Self::Node>;
    /// entries of a mapping node in source order (empty for other nodes)
    fn entries(node: &Self::Node) -> Vec<(String, &Self::Node)>;
    fn get<'a>(node: &'a Self::Node, key: &str) -> Option<&'a Self::Node>;

    /// Text of a scalar node used where the schema expects a plain string.
    fn coerce_str(node: &Self::Node) -> Option<String>;
    fn coerce_bool(node: &Self::Node) -> Option<bool>;

    fn build_scalar(scalar: Scalar) -> Self::Node;
    fn build_sequence(items: Vec<Self::Node>) -> Self::Node;
    fn build_mapping(entries: Vec<(String, Self::Node)>) -> Self::Node;

    fn build_str(value: &str) -> Self::Node {
        Self::build_scalar(Scalar::String(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Brace- or bracket-delimited input is JSON; anything else is YAML.
    pub fn detect(text: &str) -> Self {
        match text.trim_start_matches('\u{feff}').trim_start().chars().next() {
            Some('{') | Some('[') => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(DocumentFormat::Json),
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Json => "json",
            DocumentFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentFormat {
    type Err = HumanTaskError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s.trim())
            .ok_or_else(|| HumanTaskError::InvalidParameter(format!("unknown format: {s}")))
    }
}

/// Document codec configured by an explicit `CodecConfig`
#[derive(Debug, Clone, Default)]
pub struct HumanTaskCodec {
    config: CodecConfig,
}

impl HumanTaskCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn decode_document(
        &self,
        bytes: &[u8],
        format: DocumentFormat,
    ) -> Result<HumanTaskDefinition, HumanTaskError> {
        if bytes.len() > self.config.max_document_bytes {
            return Err(HumanTaskError::DocumentTooLarge {
                size: bytes.len(),
                max: self.config.max_document_bytes,
            });
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|e| HumanTaskError::ParseError(format!("input is not utf-8: {e}")))?;
        tracing::debug!("decode {} document ({} bytes)", format, bytes.len());
        match format {
            DocumentFormat::Json => Self::decode_with::<JsonAdapter>(text),
            DocumentFormat::Yaml => Self::decode_with::<YamlAdapter>(text),
        }
    }

    pub fn encode_document(
        &self,
        document: &HumanTaskDefinition,
        format: DocumentFormat,
    ) -> Result<Vec<u8>, HumanTaskError> {
        tracing::debug!("encode document {} as {}", document.id(), format);
        let text = match format {
            DocumentFormat::Json => self.encode_with::<JsonAdapter>(document)?,
            DocumentFormat::Yaml => self.encode_with::<YamlAdapter>(document)?,
        };
        Ok(text.into_bytes())
    }

    pub fn decode_with<A: FormatAdapter>(
        text: &str,
    ) -> Result<HumanTaskDefinition, HumanTaskError> {
        let root = A::parse(text)?;
        let mut path = FieldPath::new();
        HumanTaskDefinition::decode::<A>(&root, &mut path)
    }

    pub fn encode_with<A: FormatAdapter>(
        &self,
        document: &HumanTaskDefinition,
    ) -> Result<String, HumanTaskError> {
        A::emit(&document.encode::<A>(), self.config.pretty)
    }
}

/// Decode with the default configuration.
pub fn decode_document(
    bytes: &[u8],
    format: DocumentFormat,
) -> Result<HumanTaskDefinition, HumanTaskError> {
    HumanTaskCodec::default().decode_document(bytes, format)
}

/// Encode with the default configuration.
pub fn encode_document(
    document: &HumanTaskDefinition,
    format: DocumentFormat,
) -> Result<Vec<u8>, HumanTaskError> {
    HumanTaskCodec::default().encode_document(document, format)
}
