use human_task_base::{error::HumanTaskError, LATEST_VERSION};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{fmt, str::FromStr};

static REFERENCE_ALPHABET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9.:\-]+$").expect("valid reference regex"));

/// Reference to a task definition: `namespace.name[:version]`
///
/// The namespace may itself contain dots; the name is the last dot-separated
/// component before the version separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskDefinitionReference {
    pub namespace: String,
    pub name: String,
    pub version: Option<String>,
}

impl TaskDefinitionReference {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: Option<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            version,
        }
    }

    pub fn parse(input: &str) -> Result<Self, HumanTaskError> {
        let invalid = || HumanTaskError::InvalidReference(input.to_string());
        let s = input.trim();
        if !REFERENCE_ALPHABET.is_match(s) {
            return Err(invalid());
        }
        let (qualified, version) = match s.split_once(':') {
            Some((q, v)) => {
                if v.is_empty() || v.contains(':') {
                    return Err(invalid());
                }
                (q, Some(v.to_string()))
            }
            None => (s, None),
        };
        let (namespace, name) = qualified.rsplit_once('.').ok_or_else(invalid)?;
        if name.is_empty() || namespace.is_empty() || namespace.split('.').any(str::is_empty) {
            return Err(invalid());
        }
        Ok(Self::new(namespace, name, version))
    }

    /// version, `latest` when omitted
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(LATEST_VERSION)
    }

    pub fn is_latest(&self) -> bool {
        self.version() == LATEST_VERSION
    }
}

impl fmt::Display for TaskDefinitionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)?;
        match &self.version {
            Some(v) if !v.trim().is_empty() => write!(f, ":{v}"),
            _ => Ok(()),
        }
    }
}

impl FromStr for TaskDefinitionReference {
    type Err = HumanTaskError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for TaskDefinitionReference {
    type Error = HumanTaskError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
