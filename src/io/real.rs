//! Production implementation of [`FileSystem`].

use crate::errors::PipelineError;
use crate::io::traits::FileSystem;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Production file system implementation.
///
/// Delegates to `std::fs` and `walkdir`. It is stateless and can be shared
/// across stage worker threads.
#[derive(Debug, Default, Clone)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }

    /// Sibling temp path, so the final rename never crosses filesystems
    fn temp_path_for(target: &Path) -> PathBuf {
        let file_name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        target.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()))
    }

    fn ensure_parent_directory(path: &Path) -> Result<(), PipelineError> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .map_err(|e| {
                    PipelineError::io_with_path(
                        format!("Failed to create directory: {}", e),
                        parent,
                    )
                }),
            _ => Ok(()),
        }
    }
}

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PipelineError> {
        fs::read_to_string(path)
            .map_err(|e| PipelineError::io_with_path(format!("Failed to read file: {}", e), path))
    }

    fn write_atomic(&self, path: &Path, content: &str) -> Result<(), PipelineError> {
        Self::ensure_parent_directory(path)?;

        let temp_path = Self::temp_path_for(path);
        fs::write(&temp_path, content).map_err(|e| {
            PipelineError::io_with_path(
                format!("Failed to write temporary file: {}", e),
                &temp_path,
            )
        })?;

        fs::rename(&temp_path, path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            PipelineError::io_with_path(format!("Failed to rename file atomically: {}", e), path)
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>, PipelineError> {
        fs::read_dir(root).map_err(|e| {
            PipelineError::io_with_path(format!("Failed to read directory: {}", e), root)
        })?;

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true) {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => {
                    let path = e.path().unwrap_or(root).display().to_string();
                    log::warn!("Skipping unreadable entry {}: {}", path, e);
                }
            }
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_parents_and_leaves_no_temp() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("curated/foo/bar.json");
        let fs = RealFileSystem::new();

        fs.write_atomic(&target, "{\"metrics\": []}\n").unwrap();

        assert_eq!(fs.read_to_string(&target).unwrap(), "{\"metrics\": []}\n");
        let siblings: Vec<_> = std::fs::read_dir(target.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(siblings.len(), 1);
    }

    #[test]
    fn test_write_atomic_replaces_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("log.json");
        let fs = RealFileSystem::new();

        fs.write_atomic(&target, "old").unwrap();
        fs.write_atomic(&target, "new").unwrap();

        assert_eq!(fs.read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn test_list_files_recurses() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("a/b")).unwrap();
        std::fs::write(temp_dir.path().join("top.json"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("a/b/deep.json"), "{}").unwrap();

        let mut files = RealFileSystem::new().list_files(temp_dir.path()).unwrap();
        files.sort();

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("a/b/deep.json")));
    }

    #[test]
    fn test_list_files_missing_root_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = RealFileSystem::new().list_files(&temp_dir.path().join("nope"));
        assert!(result.is_err());
    }

    #[test]
    fn test_read_missing_file_reports_path() {
        let err = RealFileSystem::new()
            .read_to_string(Path::new("/definitely/not/here.json"))
            .unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
