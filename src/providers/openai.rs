//! OpenAI-backed worker coordination and image rendering.
//!
//! The coordinator executes a stage's tasks sequentially against the
//! chat completions API, threading each task's output into the next
//! task's context, and returns the final task's text as the stage's
//! synthesized result. The renderer calls the images API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::ModelConfig;
use crate::error::ProviderError;
use crate::personas::{Capability, WorkerSpec};
use crate::pipeline::stage::{Stage, StageTask};

use super::{
    CapabilityProvider, ImageArtifact, ImageRenderer, ProviderResult, RenderOptions,
    WorkerCoordinator,
};

const OPENAI_CHAT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_IMAGE_API_URL: &str = "https://api.openai.com/v1/images/generations";
const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
const HTTP_TIMEOUT_SECS: u64 = 120;

/// Maximum search hits injected into a search-capable worker's prompt.
const MAX_SEARCH_HITS: usize = 5;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: String,
    revised_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Map an unsuccessful HTTP status plus response body to a provider
/// error. Shared by the coordinator and the renderer.
fn map_status(status: StatusCode, body: &str) -> ProviderError {
    let detail = serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.chars().take(200).collect());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Auth(detail),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimit,
        _ => ProviderError::Rejected(format!("HTTP {}: {}", status, detail)),
    }
}

fn parse_chat_response(body: &str) -> ProviderResult<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| ProviderError::MalformedResponse("no completion content".to_string()))
}

fn parse_image_response(body: &str) -> ProviderResult<ImageArtifact> {
    let response: ImageGenerationResponse = serde_json::from_str(body)?;
    response
        .data
        .into_iter()
        .next()
        .map(|d| ImageArtifact {
            url: d.url,
            revised_prompt: d.revised_prompt,
        })
        .ok_or_else(|| ProviderError::MalformedResponse("no image data".to_string()))
}

/// System prompt materialized from a worker persona.
fn system_prompt(worker: &WorkerSpec) -> String {
    format!(
        "You are {role}. {background}\n\nYour objective: {objective}",
        role = worker.role,
        background = worker.background,
        objective = worker.objective,
    )
}

pub struct OpenAiCoordinator {
    client: Client,
    api_key: String,
    model: ModelConfig,
    capabilities: Option<Arc<dyn CapabilityProvider>>,
}

impl OpenAiCoordinator {
    pub fn new(api_key: String, model: ModelConfig) -> ProviderResult<Self> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::Auth("model API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model,
            capabilities: None,
        })
    }

    /// Attach a search/scrape backend. Search-capable workers get their
    /// prompts enriched with top results for the task at hand.
    pub fn with_capabilities(mut self, capabilities: Arc<dyn CapabilityProvider>) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    async fn complete(&self, system: &str, user: &str) -> ProviderResult<String> {
        let payload = json!({
            "model": self.model.model,
            "temperature": self.model.temperature,
            "max_tokens": self.model.max_tokens,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        let response = self
            .client
            .post(OPENAI_CHAT_API_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(map_status(status, &body));
        }

        parse_chat_response(&body)
    }

    /// Fetch search context for a task when the worker may search and a
    /// backend is attached. Search failures degrade to no enrichment;
    /// they never fail the task on their own.
    async fn search_context(&self, worker: &WorkerSpec, task: &StageTask) -> Option<String> {
        let capabilities = self.capabilities.as_ref()?;
        if !worker.has_capability(Capability::Search) {
            return None;
        }

        let query: String = task
            .prompt
            .description
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(200)
            .collect();
        if query.is_empty() {
            return None;
        }

        match capabilities.search(&query).await {
            Ok(hits) if !hits.is_empty() => {
                let mut context = String::from("Relevant web search results:\n");
                for hit in hits.iter().take(MAX_SEARCH_HITS) {
                    context.push_str(&format!("- {} ({}): {}\n", hit.title, hit.url, hit.snippet));
                }
                Some(context)
            }
            Ok(_) => None,
            Err(e) => {
                warn!("Search enrichment failed, continuing without it: {}", e);
                None
            }
        }
    }

    fn user_prompt(task: &StageTask, search_context: Option<&str>, prior_outputs: &str) -> String {
        let mut prompt = task.prompt.description.clone();
        prompt.push_str("\n\nExpected output:\n");
        prompt.push_str(&task.prompt.expected_output);
        if let Some(context) = search_context {
            prompt.push_str("\n\n");
            prompt.push_str(context);
        }
        if !prior_outputs.is_empty() {
            prompt.push_str("\n\nContext from your co-workers:\n");
            prompt.push_str(prior_outputs);
        }
        prompt
    }
}

#[async_trait]
impl WorkerCoordinator for OpenAiCoordinator {
    async fn execute(&self, stage: &Stage) -> ProviderResult<String> {
        info!(
            "Coordinating stage {} with {} tasks and {} workers",
            stage.name,
            stage.tasks.len(),
            stage.workers.len()
        );

        let mut prior_outputs = String::new();
        let mut last_output = String::new();

        for task in &stage.tasks {
            let worker = stage.worker(&task.worker_role).ok_or_else(|| {
                ProviderError::Rejected(format!(
                    "no worker '{}' registered for stage {}",
                    task.worker_role, stage.name
                ))
            })?;

            debug!("Running task for {} in stage {}", worker.role, stage.name);

            let search_context = self.search_context(worker, task).await;
            let user = Self::user_prompt(task, search_context.as_deref(), &prior_outputs);
            let output = self.complete(&system_prompt(worker), &user).await?;

            prior_outputs.push_str(&format!("[{}]\n{}\n\n", worker.role, output));
            last_output = output;
        }

        // the final task's answer is the stage's synthesized result
        Ok(last_output)
    }
}

pub struct DalleRenderer {
    client: Client,
    api_key: String,
    model: String,
}

impl DalleRenderer {
    pub fn new(api_key: String) -> ProviderResult<Self> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::Auth("model API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: DEFAULT_IMAGE_MODEL.to_string(),
        })
    }
}

#[async_trait]
impl ImageRenderer for DalleRenderer {
    async fn render_image(
        &self,
        description: &str,
        options: &RenderOptions,
    ) -> ProviderResult<ImageArtifact> {
        let mut prompt = format!(
            "Generate an image based on the following description: {}",
            description
        );
        if let Some(style) = &options.style {
            prompt.push_str(&format!("\nImage style: {}", style));
        }

        let payload = json!({
            "model": self.model,
            "prompt": prompt,
            "n": 1,
            "size": options.size,
        });

        let response = self
            .client
            .post(OPENAI_IMAGE_API_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(map_status(status, &body));
        }

        parse_image_response(&body)
    }
}
