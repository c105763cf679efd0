pub mod codec_config;
pub mod error;
pub mod limits;

pub static APP_NAME: &str = "human-task";

/// Specification version written by builders when none is given.
pub static DEFAULT_SPEC_VERSION: &str = "0.1.0";

/// Expression language assumed when a document does not declare one.
pub static DEFAULT_EXPRESSION_LANGUAGE: &str = "jq";

/// Version sentinel of a task reference that omits `:version`.
pub static LATEST_VERSION: &str = "latest";
