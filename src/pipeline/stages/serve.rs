//! Transformed -> Servable: mark ready for the dashboard. No content changes.

use crate::core::{Stage, Timestamp};
use crate::errors::StageError;
use crate::pipeline::stage::{load_promotable, StageOutput, StageProcessor};

#[derive(Debug, Default, Clone, Copy)]
pub struct ServeStage;

impl StageProcessor for ServeStage {
    fn stage(&self) -> Stage {
        Stage::Serve
    }

    fn execute(&self, content: &str, now: Timestamp) -> Result<StageOutput, StageError> {
        let mut file = load_promotable(content, Stage::Serve)?;

        for record in &mut file.metrics {
            record.mark_served(now);
        }
        file.promote(Stage::Serve, now);
        file.ready_for_dashboard = true;

        let count = file.metrics.len();
        Ok(StageOutput {
            file,
            records_in: count,
            records_out: count,
            message: "Ready for dashboard serving".to_string(),
        })
    }
}
