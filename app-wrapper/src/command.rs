use anyhow::Result;
use human_task_base::codec_config::CodecConfig;
use human_task_infra::codec::DocumentFormat;
use human_task_infra::definition::HumanTaskDefinition;
use human_task_infra::reader::HumanTaskDefinitionReader;
use std::path::Path;

/// Install the stderr subscriber (`RUST_LOG`, default `info`)
pub fn tracing_init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub struct HumanTaskCommand {
    reader: HumanTaskDefinitionReader,
}

impl HumanTaskCommand {
    pub fn new(config: CodecConfig) -> Self {
        Self {
            reader: HumanTaskDefinitionReader::new(config),
        }
    }

    pub fn load(&self, file: &Path, format: Option<DocumentFormat>) -> Result<HumanTaskDefinition> {
        self.reader.read_path(file, format)
    }

    /// Decode the document and describe it in one line.
    pub fn validate(&self, file: &Path, format: Option<DocumentFormat>) -> Result<String> {
        let definition = self.load(file, format)?;
        tracing::info!("valid definition: {}", definition.id());
        Ok(format!(
            "{} (deadlines: {}, completion behaviors: {}, outcomes: {})",
            definition.id(),
            definition.deadlines.len(),
            definition.completion_behaviors.len(),
            definition.outcomes.len()
        ))
    }

    /// Re-encode the document in the target format.
    pub fn convert(
        &self,
        file: &Path,
        format: Option<DocumentFormat>,
        to: DocumentFormat,
    ) -> Result<Vec<u8>> {
        let definition = self.load(file, format)?;
        Ok(self.reader.codec().encode_document(&definition, to)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_yaml() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"name: fake-task\nnamespace: fake-namespace\nversion: 1.0.0\nspecVersion: 0.1.0\n\
outcomes:\n  - name: done\n",
        )
        .unwrap();
        file
    }

    #[test]
    fn test_validate() {
        let file = write_yaml();
        let command = HumanTaskCommand::new(CodecConfig::default());
        let summary = command.validate(file.path(), None).unwrap();
        assert!(summary.starts_with("fake-namespace.fake-task:1.0.0"));
        assert!(summary.contains("outcomes: 1"));
    }

    #[test]
    fn test_convert_to_json() {
        let file = write_yaml();
        let command = HumanTaskCommand::new(CodecConfig::new(Some(false), None));
        let bytes = command
            .convert(file.path(), Some(DocumentFormat::Yaml), DocumentFormat::Json)
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with(r#"{"id":"fake-namespace.fake-task:1.0.0","name":"fake-task""#));
        assert!(text.contains(r#""outcomes":[{"name":"done"}]"#));
    }

    #[test]
    fn test_invalid_document_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"name: only-name\n").unwrap();
        let command = HumanTaskCommand::new(CodecConfig::default());
        assert!(command.validate(file.path(), None).is_err());
    }
}
