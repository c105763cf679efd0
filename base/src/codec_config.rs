use crate::limits::DEFAULT_MAX_DOCUMENT_BYTES;
use serde::Deserialize;

/// Configuration for the definition codec and reader
///
/// Passed explicitly to the codec; nothing reads it from a global.
///
/// # Environment Variables
/// - `HUMAN_TASK_PRETTY`: pretty-print JSON output (default: true)
/// - `HUMAN_TASK_MAX_DOCUMENT_BYTES`: maximum accepted input size (default: 10MB)
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct CodecConfig {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
}

fn default_pretty() -> bool {
    true
}
fn default_max_document_bytes() -> usize {
    DEFAULT_MAX_DOCUMENT_BYTES
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

impl CodecConfig {
    pub fn new(pretty: Option<bool>, max_document_bytes: Option<usize>) -> Self {
        Self {
            pretty: pretty.unwrap_or_else(default_pretty),
            max_document_bytes: max_document_bytes.unwrap_or_else(default_max_document_bytes),
        }
    }

    /// Load configuration from `HUMAN_TASK_*` environment variables
    pub fn from_env() -> Self {
        envy::prefixed("HUMAN_TASK_")
            .from_env::<CodecConfig>()
            .unwrap_or_else(|e| {
                tracing::warn!("cannot read codec config from env, use default: {:?}", e);
                Self::default()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert!(config.pretty);
        assert_eq!(config.max_document_bytes, DEFAULT_MAX_DOCUMENT_BYTES);
    }

    #[test]
    fn test_new_with_overrides() {
        let config = CodecConfig::new(Some(false), Some(1024));
        assert!(!config.pretty);
        assert_eq!(config.max_document_bytes, 1024);
        assert_eq!(CodecConfig::new(None, None), CodecConfig::default());
    }

    #[test]
    fn test_from_iter_like_env() {
        let vars = vec![
            ("HUMAN_TASK_PRETTY".to_string(), "false".to_string()),
            ("HUMAN_TASK_MAX_DOCUMENT_BYTES".to_string(), "2048".to_string()),
        ];
        let config = envy::prefixed("HUMAN_TASK_")
            .from_iter::<_, CodecConfig>(vars)
            .unwrap();
        assert!(!config.pretty);
        assert_eq!(config.max_document_bytes, 2048);
    }
}
