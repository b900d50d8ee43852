use crate::errors::PipelineError;
use crate::io::traits::FileSystem;
use std::path::{Path, PathBuf};

/// Walks one stage directory and lists every `.json` file below it.
///
/// Relative paths use `/` separators and are sorted lexicographically, so two
/// walks over the same tree always visit files in the same order.
pub struct TreeWalker<'a> {
    fs: &'a dyn FileSystem,
    root: PathBuf,
    extension: String,
    exclude: Vec<glob::Pattern>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(fs: &'a dyn FileSystem, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
            extension: "json".to_string(),
            exclude: vec![],
        }
    }

    /// Skip relative paths matching any of these glob patterns.
    pub fn with_exclude_patterns(mut self, patterns: &[String]) -> Result<Self, PipelineError> {
        self.exclude = patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Relative paths of every file to process, in walk order.
    pub fn walk(&self) -> Result<Vec<PathBuf>, PipelineError> {
        let mut relative: Vec<(String, PathBuf)> = self
            .fs
            .list_files(&self.root)?
            .into_iter()
            .filter(|path| self.has_extension(path))
            .filter_map(|path| path.strip_prefix(&self.root).ok().map(Path::to_path_buf))
            .map(|rel| (normalize(&rel), rel))
            .filter(|(key, _)| !self.is_excluded(key))
            .collect();

        relative.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(relative.into_iter().map(|(_, rel)| rel).collect())
    }

    /// Read one file given its path relative to the root.
    pub fn read(&self, relative: &Path) -> Result<String, PipelineError> {
        self.fs.read_to_string(&self.root.join(relative))
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }

    fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(relative))
    }
}

/// Relative path as a `/`-separated string, the form used in logs and reports.
pub fn normalize(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
