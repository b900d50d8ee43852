//! Curated -> Transformed: classify numeric values by magnitude.

use crate::core::{Stage, Timestamp};
use crate::errors::StageError;
use crate::pipeline::stage::{load_promotable, StageOutput, StageProcessor};

#[derive(Debug, Default, Clone, Copy)]
pub struct TransformStage;

impl StageProcessor for TransformStage {
    fn stage(&self) -> Stage {
        Stage::Transform
    }

    fn execute(&self, content: &str, now: Timestamp) -> Result<StageOutput, StageError> {
        let mut file = load_promotable(content, Stage::Transform)?;

        for record in &mut file.metrics {
            record.classify(now);
        }
        file.promote(Stage::Transform, now);

        let count = file.metrics.len();
        Ok(StageOutput {
            file,
            records_in: count,
            records_out: count,
            message: format!("Transformed {} metrics", count),
        })
    }
}
