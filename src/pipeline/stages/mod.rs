//! The three stage processors, one per module.

pub mod curate;
pub mod serve;
pub mod transform;

pub use curate::CurateStage;
pub use serve::ServeStage;
pub use transform::TransformStage;

use super::stage::StageProcessor;
use crate::core::Stage;

/// The processor implementing `stage`.
pub fn processor_for(stage: Stage) -> Box<dyn StageProcessor> {
    match stage {
        Stage::Curate => Box::new(CurateStage),
        Stage::Transform => Box::new(TransformStage),
        Stage::Serve => Box::new(ServeStage),
    }
}
