//! In-memory [`FileSystem`] for tests and dry experiments.

use crate::errors::PipelineError;
use crate::io::traits::FileSystem;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Thread-safe map from path to file content.
///
/// Directories are implicit: a path is a directory if any file lives below it.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RwLock<BTreeMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a file system pre-populated with `(path, content)` pairs.
    pub fn with_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<PathBuf>,
        C: Into<String>,
    {
        let files = files
            .into_iter()
            .map(|(path, content)| (path.into(), content.into()))
            .collect();
        Self {
            files: RwLock::new(files),
        }
    }

    /// Insert or replace a file directly.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        if let Ok(mut files) = self.files.write() {
            files.insert(path.into(), content.into());
        }
    }

    /// Copy of every file, in path order.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, String> {
        self.files
            .read()
            .map(|files| files.clone())
            .unwrap_or_default()
    }

    fn lock_error(path: &Path) -> PipelineError {
        PipelineError::io_with_path("In-memory file system lock poisoned", path)
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PipelineError> {
        self.files
            .read()
            .map_err(|_| Self::lock_error(path))?
            .get(path)
            .cloned()
            .ok_or_else(|| PipelineError::io_with_path("Failed to read file: not found", path))
    }

    fn write_atomic(&self, path: &Path, content: &str) -> Result<(), PipelineError> {
        self.files
            .write()
            .map_err(|_| Self::lock_error(path))?
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files
            .read()
            .map(|files| files.contains_key(path) || files.keys().any(|p| p.starts_with(path)))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .read()
            .map(|files| files.keys().any(|p| p != path && p.starts_with(path)))
            .unwrap_or(false)
    }

    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>, PipelineError> {
        if !self.is_dir(root) {
            return Err(PipelineError::io_with_path(
                "Failed to read directory: not found",
                root,
            ));
        }
        let files = self.files.read().map_err(|_| Self::lock_error(root))?;
        Ok(files
            .keys()
            .filter(|p| p.starts_with(root) && p.as_path() != root)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directories_are_implicit() {
        let fs = MemoryFileSystem::with_files([("data/raw/a/b.json", "{}")]);

        assert!(fs.is_dir(Path::new("data/raw")));
        assert!(fs.is_dir(Path::new("data/raw/a")));
        assert!(!fs.is_dir(Path::new("data/raw/a/b.json")));
        assert!(!fs.is_dir(Path::new("data/curated")));
        assert!(fs.exists(Path::new("data/raw/a/b.json")));
    }

    #[test]
    fn test_list_files_scoped_to_root() {
        let fs = MemoryFileSystem::with_files([
            ("data/raw/x.json", "{}"),
            ("data/raw/sub/y.json", "{}"),
            ("data/curated/x.json", "{}"),
        ]);

        let files = fs.list_files(Path::new("data/raw")).unwrap();

        assert_eq!(
            files,
            vec![
                PathBuf::from("data/raw/sub/y.json"),
                PathBuf::from("data/raw/x.json")
            ]
        );
        assert!(fs.list_files(Path::new("data/servable")).is_err());
    }

    #[test]
    fn test_write_then_read() {
        let fs = MemoryFileSystem::new();
        fs.write_atomic(Path::new("a/b.json"), "1").unwrap();
        assert_eq!(fs.read_to_string(Path::new("a/b.json")).unwrap(), "1");
        assert!(fs.read_to_string(Path::new("a/c.json")).is_err());
    }
}
