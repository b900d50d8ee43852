//! Placement of stage directories and metadata files under the data root.

use crate::core::{FileStage, Stage};
use std::path::{Path, PathBuf};

/// Path mapping for one data root.
///
/// ```text
/// <root>/raw/**.json                    -> curate input
/// <root>/curated/**.json                -> transform input
/// <root>/transformed/**.json            -> serve input
/// <root>/servable/**.json               -> presentation feed
/// <root>/metadata/pipeline_log.json     -> run log
/// <root>/metadata/source_manifest.json  -> ingestion manifest
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stage_dir(&self, stage: FileStage) -> PathBuf {
        self.root.join(stage.dir_name())
    }

    pub fn input_dir(&self, stage: Stage) -> PathBuf {
        self.stage_dir(stage.input())
    }

    pub fn output_dir(&self, stage: Stage) -> PathBuf {
        self.stage_dir(stage.output())
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.root.join("metadata")
    }

    pub fn run_log_path(&self) -> PathBuf {
        self.metadata_dir().join("pipeline_log.json")
    }

    pub fn source_manifest_path(&self) -> PathBuf {
        self.metadata_dir().join("source_manifest.json")
    }

    /// Where the ingestion step drops the raw file for one metric source.
    pub fn ingested_raw_path(&self, metric_id: &str) -> PathBuf {
        self.stage_dir(FileStage::Raw)
            .join("sources")
            .join(format!("{}.json", metric_id))
    }
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new("data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_directories() {
        let layout = DataLayout::new("/srv/data");

        assert_eq!(layout.input_dir(Stage::Curate), PathBuf::from("/srv/data/raw"));
        assert_eq!(
            layout.output_dir(Stage::Serve),
            PathBuf::from("/srv/data/servable")
        );
        assert_eq!(
            layout.run_log_path(),
            PathBuf::from("/srv/data/metadata/pipeline_log.json")
        );
        assert_eq!(
            layout.ingested_raw_path("safety_researchers"),
            PathBuf::from("/srv/data/raw/sources/safety_researchers.json")
        );
    }
}
