//! Logical source descriptors: `kind:path`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Where a source's bytes live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A file relative to the local source root
    Local,
    /// A file in the remote data repository's export directory
    RemoteRepo,
    /// An arbitrary URL
    Url,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Local => "local",
            SourceKind::RemoteRepo => "remote-repo",
            SourceKind::Url => "url",
        }
    }

    fn parse(kind: &str) -> Option<SourceKind> {
        match kind {
            "local" => Some(SourceKind::Local),
            // `pdoom_data` is the name existing catalogues use for the remote repo
            "remote-repo" | "remote_repo" | "pdoom_data" => Some(SourceKind::RemoteRepo),
            "url" => Some(SourceKind::Url),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("source descriptor '{0}' is not of the form kind:path")]
    MissingSeparator(String),
    #[error("unknown source kind '{kind}' in '{descriptor}'")]
    UnknownKind { kind: String, descriptor: String },
    #[error("source descriptor '{0}' has an empty path")]
    EmptyPath(String),
}

/// A resolved-once pointer to a metric source, e.g. `pdoom_data:researchers.json`
/// or `url:https://example.org/metrics.json`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceDescriptor {
    pub kind: SourceKind,
    /// A path for `local` and `remote-repo`, a full URL for `url`
    pub location: String,
}

impl SourceDescriptor {
    pub fn new(kind: SourceKind, location: impl Into<String>) -> Self {
        Self {
            kind,
            location: location.into(),
        }
    }
}

impl FromStr for SourceDescriptor {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, location) = s
            .split_once(':')
            .ok_or_else(|| DescriptorError::MissingSeparator(s.to_string()))?;

        let kind = SourceKind::parse(kind.trim()).ok_or_else(|| DescriptorError::UnknownKind {
            kind: kind.to_string(),
            descriptor: s.to_string(),
        })?;

        let location = location.trim();
        if location.is_empty() {
            return Err(DescriptorError::EmptyPath(s.to_string()));
        }

        Ok(SourceDescriptor::new(kind, location))
    }
}

impl TryFrom<String> for SourceDescriptor {
    type Error = DescriptorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SourceDescriptor> for String {
    fn from(descriptor: SourceDescriptor) -> Self {
        descriptor.to_string()
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.location)
    }
}
