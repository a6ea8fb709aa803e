pub mod orchestrator;
pub mod params;
pub mod stage;

#[cfg(test)]
mod orchestrator_test;

pub use orchestrator::{
    PipelineOrchestrator, PipelineReport, PipelineResult, RunId, StageOutcome, StageReport,
};
pub use params::Parameters;
pub use stage::{Stage, StageName, StageTask};
