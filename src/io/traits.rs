//! I/O trait definitions for pipeline operations.
//!
//! Stage logic never touches `std::fs` directly. The orchestrator, run log
//! and ingestion step go through [`FileSystem`], so the same code runs against
//! the real data tree or an in-memory fixture.

use crate::errors::PipelineError;
use std::path::{Path, PathBuf};

/// File system operations trait.
///
/// Implementations should be thread-safe (`Send + Sync`) to support
/// parallel processing of files within a stage.
pub trait FileSystem: Send + Sync {
    /// Read a file's contents as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Io` if the file doesn't exist, permission is
    /// denied, or the file isn't valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, PipelineError>;

    /// Replace the file at `path` with `content` so that readers see either
    /// the old or the new content, never a partial write. Missing parent
    /// directories are created.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Io` if the directory cannot be created or the
    /// file cannot be written.
    fn write_atomic(&self, path: &Path, content: &str) -> Result<(), PipelineError>;

    /// Check if a path exists (file or directory).
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// List every regular file below `root`, recursively.
    ///
    /// Order is unspecified; callers that need determinism sort the result.
    /// Unreadable entries below `root` are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Io` if `root` itself cannot be read.
    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>, PipelineError>;
}
