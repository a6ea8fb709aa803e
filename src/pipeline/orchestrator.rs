use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ProductBrief;
use crate::error::{PipelineError, ProviderError};
use crate::personas::PersonaCatalog;
use crate::prompts::{self, PromptContext};
use crate::providers::{ImageArtifact, ImageRenderer, RenderOptions, WorkerCoordinator};

use super::params::Parameters;
use super::stage::{Stage, StageName, StageTask};

pub type RunId = Uuid;

/// Terminal artifact of one pipeline run. Both fields are optional:
/// absence reflects disabled stages, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub run_id: RunId,
    pub ad_copy: Option<String>,
    pub image: Option<ImageArtifact>,
    pub created_at: DateTime<Utc>,
}

impl PipelineResult {
    fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            ad_copy: None,
            image: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ad_copy.is_none() && self.image.is_none()
    }
}

/// Skipped (disabled by Parameters) and Failed (errored) are distinct:
/// a failed stage never masquerades as an intentionally skipped one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StageOutcome {
    Skipped,
    Completed,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: StageName,
    pub outcome: StageOutcome,
    pub tasks_submitted: usize,
}

impl StageReport {
    fn skipped(stage: StageName) -> Self {
        Self {
            stage,
            outcome: StageOutcome::Skipped,
            tasks_submitted: 0,
        }
    }

    fn completed(stage: StageName, tasks_submitted: usize) -> Self {
        Self {
            stage,
            outcome: StageOutcome::Completed,
            tasks_submitted,
        }
    }

    fn failed(stage: StageName, error: &ProviderError, tasks_submitted: usize) -> Self {
        Self {
            stage,
            outcome: StageOutcome::Failed(error.to_string()),
            tasks_submitted,
        }
    }
}

/// Outcome of a whole run: the (possibly partial) result, a per-stage
/// report, and the failure that aborted the run, if any. Completed
/// stages keep their results even when a later stage fails — the caller
/// decides whether to display partial output.
#[derive(Debug)]
pub struct PipelineReport {
    pub result: PipelineResult,
    pub stages: Vec<StageReport>,
    pub failure: Option<PipelineError>,
}

impl PipelineReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn stage_report(&self, stage: StageName) -> Option<&StageReport> {
        self.stages.iter().find(|r| r.stage == stage)
    }
}

/// Sequences the fixed stage plan, executes each enabled stage through
/// the external worker-coordinator, and threads outputs forward. One
/// run owns its workers, tasks and result exclusively; no state is
/// shared across concurrent runs.
pub struct PipelineOrchestrator {
    coordinator: Arc<dyn WorkerCoordinator>,
    renderer: Arc<dyn ImageRenderer>,
    product: ProductBrief,
}

impl PipelineOrchestrator {
    pub fn new(
        coordinator: Arc<dyn WorkerCoordinator>,
        renderer: Arc<dyn ImageRenderer>,
        product: ProductBrief,
    ) -> Self {
        Self {
            coordinator,
            renderer,
            product,
        }
    }

    /// Execute one full run. Never retries internally; a provider
    /// failure aborts the remaining stages and is reported tagged with
    /// the stage it occurred in.
    pub async fn run(&self, params: Parameters) -> PipelineReport {
        let run_id = Uuid::new_v4();
        info!("Starting pipeline run {}", run_id);

        let mut result = PipelineResult::new(run_id);
        let mut stages = Vec::new();

        let ctx = PromptContext {
            product_website: &self.product.website,
            product_details: &self.product.details,
            params: &params,
        };

        // materialize workers fresh for this run
        let analyst = PersonaCatalog::lead_market_analyst();
        let strategist = PersonaCatalog::chief_marketing_strategist();
        let creator = PersonaCatalog::creative_content_creator();

        // research and campaign tasks merge into one content invocation
        let mut content_tasks = Vec::new();

        let research_enabled = params.research_enabled();
        if research_enabled {
            content_tasks.push(StageTask::new(&analyst, prompts::product_analysis(&ctx)));
            content_tasks.push(StageTask::new(&analyst, prompts::competitor_analysis(&ctx)));
        } else {
            debug!("Research stage disabled: no country selected");
        }

        let campaign_enabled = params.campaign_enabled();
        if campaign_enabled {
            content_tasks.push(StageTask::new(
                &strategist,
                prompts::campaign_development(&ctx),
            ));
            content_tasks.push(StageTask::new(&creator, prompts::ad_copy(&ctx)));
        } else {
            debug!("Campaign stage disabled: platform, tone and audience not all set");
        }

        if content_tasks.is_empty() {
            // no coordinator call at all
            debug!("Content synthesis skipped entirely for run {}", run_id);
            stages.push(StageReport::skipped(StageName::Research));
            stages.push(StageReport::skipped(StageName::Campaign));
            stages.push(StageReport::skipped(StageName::ContentSynthesis));
        } else {
            let stage = Stage::new(
                StageName::ContentSynthesis,
                content_tasks,
                vec![analyst, strategist, creator],
            );
            let submitted = stage.tasks.len();
            info!(
                "Executing content synthesis with {} tasks for run {}",
                submitted, run_id
            );

            // research and campaign run inside the merged invocation, so
            // their outcomes are settled by its result, not at
            // task-materialization time
            match self.execute_stage(&stage).await {
                Ok(text) => {
                    stages.push(Self::gated_report(StageName::Research, research_enabled, None));
                    stages.push(Self::gated_report(StageName::Campaign, campaign_enabled, None));
                    result.ad_copy = Some(text);
                    stages.push(StageReport::completed(StageName::ContentSynthesis, submitted));
                }
                Err(e) => {
                    stages.push(Self::gated_report(
                        StageName::Research,
                        research_enabled,
                        Some(&e),
                    ));
                    stages.push(Self::gated_report(
                        StageName::Campaign,
                        campaign_enabled,
                        Some(&e),
                    ));
                    return Self::abort(result, stages, StageName::ContentSynthesis, submitted, e);
                }
            }
        }

        // image stage needs a style and a non-empty ad copy
        let image_description = match (&params.image_style, &result.ad_copy) {
            (Some(_), Some(copy)) => {
                let photographer = PersonaCatalog::senior_photographer();
                let director = PersonaCatalog::chief_creative_director();
                let stage = Stage::new(
                    StageName::ImageConcepting,
                    vec![
                        StageTask::new(&photographer, prompts::photograph_concept(&ctx, copy)),
                        StageTask::new(&director, prompts::photograph_review(&ctx)),
                    ],
                    vec![photographer, director],
                );
                let submitted = stage.tasks.len();
                info!(
                    "Executing image concepting with {} tasks for run {}",
                    submitted, run_id
                );

                match self.execute_stage(&stage).await {
                    Ok(text) => {
                        stages.push(StageReport::completed(StageName::ImageConcepting, submitted));
                        Some(text)
                    }
                    Err(e) => {
                        return Self::abort(
                            result,
                            stages,
                            StageName::ImageConcepting,
                            submitted,
                            e,
                        );
                    }
                }
            }
            _ => {
                debug!("Image stage disabled for run {}", run_id);
                stages.push(StageReport::skipped(StageName::ImageConcepting));
                None
            }
        };

        match image_description {
            Some(description) => {
                let options = RenderOptions {
                    style: params.image_style.clone(),
                    ..RenderOptions::default()
                };
                match self.renderer.render_image(&description, &options).await {
                    Ok(artifact) => {
                        info!("Rendered image for run {}: {}", run_id, artifact.url);
                        result.image = Some(artifact);
                        stages.push(StageReport::completed(StageName::Rendering, 0));
                    }
                    Err(e) => {
                        return Self::abort(result, stages, StageName::Rendering, 0, e);
                    }
                }
            }
            None => {
                stages.push(StageReport::skipped(StageName::Rendering));
            }
        }

        info!("Pipeline run {} completed", run_id);
        PipelineReport {
            result,
            stages,
            failure: None,
        }
    }

    /// One coordinator invocation. An empty synthesized text is never
    /// treated as success: the stage failed in its entirety.
    async fn execute_stage(&self, stage: &Stage) -> Result<String, ProviderError> {
        let text = self.coordinator.execute(stage).await?;
        if text.trim().is_empty() {
            return Err(ProviderError::MalformedResponse(format!(
                "coordinator returned empty text for stage {}",
                stage.name
            )));
        }
        Ok(text)
    }

    /// Outcome of a task-materialization stage once the merged content
    /// invocation has resolved: disabled stages stay Skipped, enabled
    /// ones share the invocation's fate.
    fn gated_report(
        stage: StageName,
        enabled: bool,
        error: Option<&ProviderError>,
    ) -> StageReport {
        match (enabled, error) {
            (false, _) => StageReport::skipped(stage),
            (true, None) => StageReport::completed(stage, 2),
            (true, Some(e)) => StageReport::failed(stage, e, 2),
        }
    }

    /// Mark the failing stage, skip everything after it, and hand the
    /// partial result back to the caller.
    fn abort(
        result: PipelineResult,
        mut stages: Vec<StageReport>,
        failed: StageName,
        tasks_submitted: usize,
        error: ProviderError,
    ) -> PipelineReport {
        warn!("Stage {} failed, aborting remaining stages: {}", failed, error);
        stages.push(StageReport::failed(failed, &error, tasks_submitted));

        let remaining: &[StageName] = match failed {
            StageName::ContentSynthesis => {
                &[StageName::ImageConcepting, StageName::Rendering]
            }
            StageName::ImageConcepting => &[StageName::Rendering],
            _ => &[],
        };
        for stage in remaining {
            stages.push(StageReport::skipped(*stage));
        }

        PipelineReport {
            result,
            stages,
            failure: Some(PipelineError::stage(failed, error)),
        }
    }
}
