//! Per-file result collection for stage runs.
//!
//! Each file in a stage is processed independently; a failure on one file
//! never stops its siblings. Instead of stopping at the first error we keep
//! BOTH successes and failures, in walk order, and report them together.

use std::path::PathBuf;

/// Results from one batch of independent per-file operations.
#[derive(Debug, Clone)]
pub struct FileResults<T> {
    pub successes: Vec<T>,
    pub failures: Vec<FileFailure>,
}

impl<T> Default for FileResults<T> {
    fn default() -> Self {
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> FileResults<T> {
    pub fn new(successes: Vec<T>, failures: Vec<FileFailure>) -> Self {
        Self {
            successes,
            failures,
        }
    }

    /// Split an ordered sequence of outcomes, preserving relative order on
    /// both sides.
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = Result<T, FileFailure>>) -> Self {
        let mut results = Self::default();
        for outcome in outcomes {
            match outcome {
                Ok(success) => results.successes.push(success),
                Err(failure) => results.failures.push(failure),
            }
        }
        results
    }

    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn total_count(&self) -> usize {
        self.success_count() + self.failure_count()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A file that could not be carried through a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// Path relative to the stage input directory
    pub path: PathBuf,
    pub kind: FailureKind,
    pub error: String, // String for Clone, preserves error message
}

impl FileFailure {
    pub fn new(path: impl Into<PathBuf>, kind: FailureKind, error: impl ToString) -> Self {
        Self {
            path: path.into(),
            kind,
            error: error.to_string(),
        }
    }
}

/// Category of a per-file failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Source or destination unreadable/unwritable
    Io,
    /// Not valid JSON, or not a metric file
    Parse,
    /// Missing or malformed top-level `metrics`
    Validation,
    /// File or record has not passed the upstream stage
    StageOrder,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Io => "I/O",
            Self::Parse => "Parse",
            Self::Validation => "Validation",
            Self::StageOrder => "Stage order",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_results_success_count() {
        let results = FileResults {
            successes: vec![1, 2, 3],
            failures: vec![],
        };

        assert_eq!(results.success_count(), 3);
        assert_eq!(results.failure_count(), 0);
        assert_eq!(results.total_count(), 3);
        assert!(results.is_complete_success());
    }

    #[test]
    fn test_from_outcomes_preserves_order() {
        let outcomes = vec![
            Ok("a.json"),
            Err(FileFailure::new("b.json", FailureKind::Parse, "bad json")),
            Ok("c.json"),
            Err(FileFailure::new("d.json", FailureKind::Io, "denied")),
        ];

        let results = FileResults::from_outcomes(outcomes);

        assert_eq!(results.successes, vec!["a.json", "c.json"]);
        assert_eq!(results.failures[0].path, PathBuf::from("b.json"));
        assert_eq!(results.failures[1].path, PathBuf::from("d.json"));
        assert_eq!(results.total_count(), 4);
        assert!(!results.is_complete_success());
    }

    #[test]
    fn test_failure_kind_as_str() {
        assert_eq!(FailureKind::Io.as_str(), "I/O");
        assert_eq!(FailureKind::Parse.as_str(), "Parse");
        assert_eq!(FailureKind::StageOrder.as_str(), "Stage order");
    }
}
