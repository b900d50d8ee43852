//! Resolve source descriptors to raw JSON bytes.
//!
//! Fetching never blocks longer than the configured timeout and never raises
//! past the caller: every failure is reported as [`FetchError::NotFound`] or
//! [`FetchError::Malformed`] so the ingestion step can fall back to defaults.

use super::descriptor::{SourceDescriptor, SourceKind};
use crate::io::FileSystem;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_REMOTE_BASE: &str =
    "https://raw.githubusercontent.com/PipFoweraker/pdoom-data/main";
pub const DEFAULT_EXPORT_DIR: &str = "dashboard_exports";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Missing file, network failure, timeout or non-2xx response
    #[error("{descriptor} not found: {reason}")]
    NotFound { descriptor: String, reason: String },

    /// Bytes were fetched but are not valid JSON
    #[error("{descriptor} is malformed: {reason}")]
    Malformed { descriptor: String, reason: String },
}

impl FetchError {
    fn not_found(descriptor: &SourceDescriptor, reason: impl ToString) -> Self {
        Self::NotFound {
            descriptor: descriptor.to_string(),
            reason: reason.to_string(),
        }
    }

    fn malformed(descriptor: &SourceDescriptor, reason: impl ToString) -> Self {
        Self::Malformed {
            descriptor: descriptor.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Anything that can resolve a descriptor to bytes.
pub trait DataSource: Send + Sync {
    /// Fetch the bytes behind `descriptor`. Each call resolves the descriptor
    /// exactly once; there are no automatic retries.
    fn fetch(&self, descriptor: &SourceDescriptor) -> Result<Vec<u8>, FetchError>;
}

/// Remote repository location settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepo {
    pub base_url: String,
    pub export_dir: String,
}

impl Default for RemoteRepo {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REMOTE_BASE.to_string(),
            export_dir: DEFAULT_EXPORT_DIR.to_string(),
        }
    }
}

impl RemoteRepo {
    /// URL of an exported file: `<base>/<export_dir>/<path>`.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let dir = self.export_dir.trim_matches('/');
        let path = path.trim_start_matches('/');
        if dir.is_empty() {
            format!("{}/{}", base, path)
        } else {
            format!("{}/{}/{}", base, dir, path)
        }
    }
}

/// The production data source: local files through a [`FileSystem`], remote
/// files over HTTP with a global timeout.
pub struct SourceAdapter<'a> {
    fs: &'a dyn FileSystem,
    local_root: PathBuf,
    remote: RemoteRepo,
    agent: ureq::Agent,
}

impl<'a> SourceAdapter<'a> {
    pub fn new(fs: &'a dyn FileSystem, local_root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            local_root: local_root.into(),
            remote: RemoteRepo::default(),
            agent: build_agent(DEFAULT_TIMEOUT),
        }
    }

    pub fn with_remote(mut self, remote: RemoteRepo) -> Self {
        self.remote = remote;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = build_agent(timeout);
        self
    }

    fn fetch_local(&self, descriptor: &SourceDescriptor) -> Result<Vec<u8>, FetchError> {
        let path = self.local_root.join(&descriptor.location);
        self.fs
            .read_to_string(&path)
            .map(String::into_bytes)
            .map_err(|e| FetchError::not_found(descriptor, e))
    }

    fn fetch_url(&self, descriptor: &SourceDescriptor, url: &str) -> Result<Vec<u8>, FetchError> {
        log::debug!("Fetching {} from {}", descriptor, url);
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| FetchError::not_found(descriptor, e))?;

        response
            .into_body()
            .read_to_vec()
            .map_err(|e| FetchError::not_found(descriptor, e))
    }
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

impl DataSource for SourceAdapter<'_> {
    fn fetch(&self, descriptor: &SourceDescriptor) -> Result<Vec<u8>, FetchError> {
        let bytes = match descriptor.kind {
            SourceKind::Local => self.fetch_local(descriptor)?,
            SourceKind::RemoteRepo => {
                let url = self.remote.url_for(&descriptor.location);
                self.fetch_url(descriptor, &url)?
            }
            SourceKind::Url => self.fetch_url(descriptor, &descriptor.location)?,
        };
        ensure_json(descriptor, bytes)
    }
}

/// Pass `bytes` through if they parse as JSON.
pub fn ensure_json(descriptor: &SourceDescriptor, bytes: Vec<u8>) -> Result<Vec<u8>, FetchError> {
    match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(_) => Ok(bytes),
        Err(e) => Err(FetchError::malformed(descriptor, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryFileSystem;

    #[test]
    fn test_remote_url_layout() {
        let remote = RemoteRepo::default();
        assert_eq!(
            remote.url_for("safety_researchers.json"),
            "https://raw.githubusercontent.com/PipFoweraker/pdoom-data/main/dashboard_exports/safety_researchers.json"
        );

        let remote = RemoteRepo {
            base_url: "http://mirror.local/".to_string(),
            export_dir: String::new(),
        };
        assert_eq!(remote.url_for("/a.json"), "http://mirror.local/a.json");
    }

    #[test]
    fn test_local_fetch_reads_relative_to_root() {
        let fs = MemoryFileSystem::with_files([("/srv/exports/a.json", r#"{"current_value": 3}"#)]);
        let adapter = SourceAdapter::new(&fs, "/srv");

        let bytes = adapter
            .fetch(&"local:exports/a.json".parse().unwrap())
            .unwrap();

        assert_eq!(bytes, br#"{"current_value": 3}"#.to_vec());
    }

    #[test]
    fn test_local_missing_is_not_found() {
        let fs = MemoryFileSystem::new();
        let adapter = SourceAdapter::new(&fs, "/srv");

        let err = adapter.fetch(&"local:nope.json".parse().unwrap()).unwrap_err();
        assert!(matches!(err, FetchError::NotFound { .. }));
    }

    #[test]
    fn test_local_invalid_json_is_malformed() {
        let fs = MemoryFileSystem::with_files([("/srv/bad.json", "<html>")]);
        let adapter = SourceAdapter::new(&fs, "/srv");

        let err = adapter.fetch(&"local:bad.json".parse().unwrap()).unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
    }

    #[test]
    fn test_unreachable_url_is_not_found() {
        let fs = MemoryFileSystem::new();
        let adapter =
            SourceAdapter::new(&fs, "/srv").with_timeout(Duration::from_millis(200));

        // Port 9 on loopback (discard) is closed on CI hosts; the connection is refused.
        let err = adapter
            .fetch(&"url:http://127.0.0.1:9/metrics.json".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, FetchError::NotFound { .. }));
    }
}
