pub mod openai;
pub mod serper;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::pipeline::stage::Stage;

pub use openai::{DalleRenderer, OpenAiCoordinator};
pub use serper::{PageScraper, SerperSearch, WebCapabilityProvider};

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// The external worker-coordinator: takes a stage's workers and tasks
/// and returns one synthesized text result. Treated as an opaque,
/// atomic, blocking remote call with no retry built in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkerCoordinator: Send + Sync {
    async fn execute(&self, stage: &Stage) -> ProviderResult<String>;
}

/// Options for the text-to-image rendering call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    pub style: Option<String>,
    pub size: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            style: None,
            size: "1024x1024".to_string(),
        }
    }
}

/// The rendered image artifact: a URL (and the prompt the backend
/// actually used, when it reports one).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageArtifact {
    pub url: String,
    pub revised_prompt: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageRenderer: Send + Sync {
    async fn render_image(
        &self,
        description: &str,
        options: &RenderOptions,
    ) -> ProviderResult<ImageArtifact>;
}

/// One ranked web search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Search and scrape operations consumed by workers. Errors from these
/// surface only indirectly, inside the coordinator's aggregated failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    async fn search(&self, query: &str) -> ProviderResult<Vec<SearchHit>>;
    async fn scrape(&self, url: &str) -> ProviderResult<String>;
}
