pub mod config;
pub mod error;
pub mod personas;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod sink;

pub use config::PipelineConfig;
pub use error::{PipelineError, ProviderError, Result};
pub use pipeline::{Parameters, PipelineOrchestrator, PipelineReport, PipelineResult};
pub use sink::{FileResultSink, ResultSink};
