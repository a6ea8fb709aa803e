use thiserror::Error;

use crate::pipeline::stage::StageName;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Failures raised by the external capability providers (worker
/// coordinator, image renderer, search/scrape backends).
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider rejected request: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Required credential or setting missing before any stage starts.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A worker-coordinator or rendering call failed mid-run. Carries
    /// the stage it happened in; completed stages keep their results.
    #[error("Stage {stage} failed: {source}")]
    Stage {
        stage: StageName,
        #[source]
        source: ProviderError,
    },

    /// Writing or exposing the result artifact failed. Does not
    /// invalidate the already-computed pipeline result.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl PipelineError {
    pub fn stage(stage: StageName, source: ProviderError) -> Self {
        PipelineError::Stage { stage, source }
    }
}

// Conversion implementations for common error types
impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::MalformedResponse(err.to_string())
    }
}
