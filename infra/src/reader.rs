use crate::codec::{DocumentFormat, HumanTaskCodec};
use crate::definition::task::HumanTaskDefinition;
use anyhow::{Context, Result};
use human_task_base::{codec_config::CodecConfig, error::HumanTaskError};
use std::io::Read;
use std::path::Path;

/// Reads definition documents from files, strings or any `Read`.
///
/// Input larger than `max_document_bytes` is rejected before decoding. Without an
/// explicit format the content is sniffed: brace- or bracket-delimited input is read as
/// JSON (falling back to YAML if it does not parse), anything else as YAML.
#[derive(Debug, Clone, Default)]
pub struct HumanTaskDefinitionReader {
    codec: HumanTaskCodec,
}

impl HumanTaskDefinitionReader {
    pub fn new(config: CodecConfig) -> Self {
        Self {
            codec: HumanTaskCodec::new(config),
        }
    }

    pub fn codec(&self) -> &HumanTaskCodec {
        &self.codec
    }

    fn max_bytes(&self) -> usize {
        self.codec.config().max_document_bytes
    }

    pub fn read_str(
        &self,
        text: &str,
        format: Option<DocumentFormat>,
    ) -> Result<HumanTaskDefinition> {
        self.read_bytes(text.as_bytes(), format)
    }

    pub fn read_bytes(
        &self,
        bytes: &[u8],
        format: Option<DocumentFormat>,
    ) -> Result<HumanTaskDefinition> {
        if let Some(format) = format {
            return Ok(self.codec.decode_document(bytes, format)?);
        }
        let detected = DocumentFormat::detect(&String::from_utf8_lossy(
            &bytes[..bytes.len().min(64)],
        ));
        match self.codec.decode_document(bytes, detected) {
            Err(HumanTaskError::ParseError(e)) if detected == DocumentFormat::Json => {
                tracing::debug!("not parsed as json, try yaml: {}", e);
                Ok(self.codec.decode_document(bytes, DocumentFormat::Yaml)?)
            }
            res => Ok(res?),
        }
    }

    pub fn read<R: Read>(
        &self,
        reader: R,
        format: Option<DocumentFormat>,
    ) -> Result<HumanTaskDefinition> {
        let max = self.max_bytes();
        let mut buf = Vec::new();
        reader
            .take(max as u64 + 1)
            .read_to_end(&mut buf)
            .context("cannot read definition document")?;
        if buf.len() > max {
            return Err(HumanTaskError::DocumentTooLarge {
                size: buf.len(),
                max,
            }
            .into());
        }
        self.read_bytes(&buf, format)
    }

    pub fn read_path(
        &self,
        path: impl AsRef<Path>,
        format: Option<DocumentFormat>,
    ) -> Result<HumanTaskDefinition> {
        let path = path.as_ref();
        let max = self.max_bytes();
        let size = std::fs::metadata(path)
            .with_context(|| format!("cannot access {}", path.display()))?
            .len() as usize;
        if size > max {
            return Err(HumanTaskError::DocumentTooLarge { size, max }.into());
        }
        tracing::debug!("read definition from {}", path.display());
        let file = std::fs::File::open(path)
            .with_context(|| format!("cannot open {}", path.display()))?;
        self.read(file, format)
            .with_context(|| format!("cannot read definition {}", path.display()))
    }
}
