use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use marketing_content_pipeline::config::{ConfigManager, FileConfigManager};
use marketing_content_pipeline::pipeline::{Parameters, PipelineOrchestrator, StageOutcome};
use marketing_content_pipeline::providers::{
    DalleRenderer, OpenAiCoordinator, WebCapabilityProvider,
};
use marketing_content_pipeline::sink::{render_display, FileResultSink, ResultSink};

#[tokio::main]
async fn main() -> marketing_content_pipeline::error::Result<()> {
    tracing_subscriber::fmt::init();

    let config_manager = FileConfigManager::new(PathBuf::from("config.toml"));
    let config = config_manager.load_config()?;

    tracing::info!("Starting marketing content pipeline");

    let params = parse_args(std::env::args().skip(1));

    let mut coordinator =
        OpenAiCoordinator::new(config.credentials.model_api_key.clone(), config.model.clone())
            .map_err(|e| format!("Failed to initialize coordinator: {}", e))?;

    // search enrichment only when a search key is configured
    if !config.credentials.search_api_key.trim().is_empty() {
        let capabilities = WebCapabilityProvider::new(config.credentials.search_api_key.clone())
            .map_err(|e| format!("Failed to initialize search backend: {}", e))?;
        coordinator = coordinator.with_capabilities(Arc::new(capabilities));
    }

    let renderer = DalleRenderer::new(config.credentials.model_api_key.clone())
        .map_err(|e| format!("Failed to initialize image renderer: {}", e))?;

    let orchestrator = PipelineOrchestrator::new(
        Arc::new(coordinator),
        Arc::new(renderer),
        config.product.clone(),
    );

    let report = orchestrator.run(params).await;

    for stage_report in &report.stages {
        match &stage_report.outcome {
            StageOutcome::Completed => {
                tracing::info!("Stage {} completed", stage_report.stage)
            }
            StageOutcome::Skipped => tracing::info!("Stage {} skipped", stage_report.stage),
            StageOutcome::Failed(reason) => {
                tracing::error!("Stage {} failed: {}", stage_report.stage, reason)
            }
        }
    }

    // partial results are still worth showing and persisting
    print!("{}", render_display(&report.result));

    if !report.result.is_empty() {
        let sink = FileResultSink::new(config.output.directory.clone());
        match sink.persist(&report.result).await {
            Ok(artifact) => {
                tracing::info!("Result saved to {}", artifact.path.display());
                println!("\nSaved to {}", artifact.path.display());
            }
            Err(e) => tracing::error!("Failed to persist result: {}", e),
        }
    }

    if let Some(failure) = report.failure {
        return Err(failure.into());
    }

    tracing::info!("Pipeline finished");
    Ok(())
}

/// CLI arguments are key=value pairs, e.g.
/// `country=Australia platform=Instagram tone=Casual audience=Adults image_style=Photorealistic`
fn parse_args(args: impl Iterator<Item = String>) -> Parameters {
    let mut values: HashMap<String, String> = HashMap::new();
    for arg in args {
        if let Some((key, value)) = arg.split_once('=') {
            values.insert(key.to_string(), value.to_string());
        } else {
            tracing::warn!("Ignoring argument without '=': {}", arg);
        }
    }

    let get = |key: &str| values.get(key).map(String::as_str).unwrap_or("");
    Parameters::from_form(
        get("country"),
        get("platform"),
        get("tone"),
        get("audience"),
        get("keywords"),
        get("image_style"),
    )
}
