#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::config::ProductBrief;
    use crate::error::{PipelineError, ProviderError};
    use crate::pipeline::{Parameters, PipelineOrchestrator, StageName, StageOutcome};
    use crate::providers::{ImageArtifact, MockImageRenderer, MockWorkerCoordinator};

    fn product() -> ProductBrief {
        ProductBrief {
            website: "https://example.com".to_string(),
            details: "An example product.".to_string(),
        }
    }

    fn orchestrator(
        coordinator: MockWorkerCoordinator,
        renderer: MockImageRenderer,
    ) -> PipelineOrchestrator {
        PipelineOrchestrator::new(Arc::new(coordinator), Arc::new(renderer), product())
    }

    fn artifact(url: &str) -> ImageArtifact {
        ImageArtifact {
            url: url.to_string(),
            revised_prompt: None,
        }
    }

    #[tokio::test]
    async fn test_research_only_run() {
        let mut coordinator = MockWorkerCoordinator::new();
        coordinator
            .expect_execute()
            .withf(|stage| stage.name == StageName::ContentSynthesis && stage.tasks.len() == 2)
            .times(1)
            .returning(|_| Ok("Research-driven ad copy.".to_string()));

        let mut renderer = MockImageRenderer::new();
        renderer.expect_render_image().times(0);

        let params = Parameters::from_form("Australia", "None", "None", "None", "", "None");
        let report = orchestrator(coordinator, renderer).run(params).await;

        assert!(report.is_success());
        assert_eq!(
            report.result.ad_copy.as_deref(),
            Some("Research-driven ad copy.")
        );
        assert!(report.result.image.is_none());

        assert_eq!(
            report.stage_report(StageName::Research).unwrap().outcome,
            StageOutcome::Completed
        );
        assert_eq!(
            report.stage_report(StageName::Campaign).unwrap().outcome,
            StageOutcome::Skipped
        );
        assert_eq!(
            report.stage_report(StageName::ImageConcepting).unwrap().outcome,
            StageOutcome::Skipped
        );
        assert_eq!(
            report.stage_report(StageName::Rendering).unwrap().outcome,
            StageOutcome::Skipped
        );
    }

    #[tokio::test]
    async fn test_full_run_with_image() {
        let mut coordinator = MockWorkerCoordinator::new();
        // research + campaign merge into one four-task invocation
        coordinator
            .expect_execute()
            .withf(|stage| stage.name == StageName::ContentSynthesis && stage.tasks.len() == 4)
            .times(1)
            .returning(|_| Ok("Full ad copy.".to_string()));
        coordinator
            .expect_execute()
            .withf(|stage| stage.name == StageName::ImageConcepting && stage.tasks.len() == 2)
            .times(1)
            .returning(|_| Ok("A sunlit beach scene.".to_string()));

        let mut renderer = MockImageRenderer::new();
        renderer
            .expect_render_image()
            .withf(|description, options| {
                description == "A sunlit beach scene."
                    && options.style.as_deref() == Some("Photorealistic")
            })
            .times(1)
            .returning(|_, _| Ok(artifact("https://img.example/out.png")));

        let params = Parameters::from_form(
            "Australia",
            "Instagram",
            "Casual",
            "Young adults",
            "travel, safety",
            "Photorealistic",
        );
        let report = orchestrator(coordinator, renderer).run(params).await;

        assert!(report.is_success());
        assert_eq!(report.result.ad_copy.as_deref(), Some("Full ad copy."));
        assert_eq!(
            report.result.image.as_ref().unwrap().url,
            "https://img.example/out.png"
        );
        for stage in [
            StageName::Research,
            StageName::Campaign,
            StageName::ContentSynthesis,
            StageName::ImageConcepting,
            StageName::Rendering,
        ] {
            assert_eq!(
                report.stage_report(stage).unwrap().outcome,
                StageOutcome::Completed,
                "stage {} should be completed",
                stage
            );
        }
    }

    #[tokio::test]
    async fn test_empty_parameters_run_nothing() {
        let mut coordinator = MockWorkerCoordinator::new();
        coordinator.expect_execute().times(0);
        let mut renderer = MockImageRenderer::new();
        renderer.expect_render_image().times(0);

        let params = Parameters::from_form("None", "None", "None", "None", "", "None");
        let report = orchestrator(coordinator, renderer).run(params).await;

        assert!(report.is_success());
        assert!(report.result.is_empty());
        for stage_report in &report.stages {
            assert_eq!(stage_report.outcome, StageOutcome::Skipped);
        }
    }

    #[tokio::test]
    async fn test_image_failure_keeps_ad_copy() {
        let mut coordinator = MockWorkerCoordinator::new();
        coordinator
            .expect_execute()
            .withf(|stage| stage.name == StageName::ContentSynthesis)
            .times(1)
            .returning(|_| Ok("Survivor copy.".to_string()));
        coordinator
            .expect_execute()
            .withf(|stage| stage.name == StageName::ImageConcepting)
            .times(1)
            .returning(|_| Err(ProviderError::RateLimit));

        let mut renderer = MockImageRenderer::new();
        renderer.expect_render_image().times(0);

        let params = Parameters::from_form(
            "Australia",
            "Instagram",
            "Casual",
            "Adults",
            "",
            "Minimalist",
        );
        let report = orchestrator(coordinator, renderer).run(params).await;

        // completed work survives the later failure
        assert!(!report.is_success());
        assert_eq!(report.result.ad_copy.as_deref(), Some("Survivor copy."));
        assert!(report.result.image.is_none());

        assert!(matches!(
            report.stage_report(StageName::ImageConcepting).unwrap().outcome,
            StageOutcome::Failed(_)
        ));
        assert_eq!(
            report.stage_report(StageName::Rendering).unwrap().outcome,
            StageOutcome::Skipped
        );
        assert!(matches!(
            report.failure,
            Some(PipelineError::Stage {
                stage: StageName::ImageConcepting,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_empty_coordinator_text_is_a_failure() {
        let mut coordinator = MockWorkerCoordinator::new();
        coordinator
            .expect_execute()
            .times(1)
            .returning(|_| Ok("   \n".to_string()));
        let mut renderer = MockImageRenderer::new();
        renderer.expect_render_image().times(0);

        let params = Parameters::from_form("Australia", "None", "None", "None", "", "None");
        let report = orchestrator(coordinator, renderer).run(params).await;

        assert!(!report.is_success());
        assert!(report.result.ad_copy.is_none());
        assert!(matches!(
            report.stage_report(StageName::ContentSynthesis).unwrap().outcome,
            StageOutcome::Failed(_)
        ));
        // the research tasks ran inside the failed invocation and
        // produced nothing, so they are not reported completed
        assert!(matches!(
            report.stage_report(StageName::Research).unwrap().outcome,
            StageOutcome::Failed(_)
        ));
        // everything downstream is skipped, not failed
        assert_eq!(
            report.stage_report(StageName::ImageConcepting).unwrap().outcome,
            StageOutcome::Skipped
        );
        assert_eq!(
            report.stage_report(StageName::Rendering).unwrap().outcome,
            StageOutcome::Skipped
        );
    }

    #[tokio::test]
    async fn test_rendering_failure_keeps_partial_result() {
        let mut coordinator = MockWorkerCoordinator::new();
        coordinator
            .expect_execute()
            .withf(|stage| stage.name == StageName::ContentSynthesis)
            .times(1)
            .returning(|_| Ok("Copy.".to_string()));
        coordinator
            .expect_execute()
            .withf(|stage| stage.name == StageName::ImageConcepting)
            .times(1)
            .returning(|_| Ok("A scene.".to_string()));

        let mut renderer = MockImageRenderer::new();
        renderer
            .expect_render_image()
            .times(1)
            .returning(|_, _| Err(ProviderError::Rejected("content policy".to_string())));

        let params = Parameters::from_form(
            "Australia",
            "Instagram",
            "Casual",
            "Adults",
            "",
            "Vivid",
        );
        let report = orchestrator(coordinator, renderer).run(params).await;

        assert!(!report.is_success());
        assert_eq!(report.result.ad_copy.as_deref(), Some("Copy."));
        assert!(report.result.image.is_none());
        assert!(matches!(
            report.stage_report(StageName::Rendering).unwrap().outcome,
            StageOutcome::Failed(_)
        ));
        assert!(matches!(
            report.failure,
            Some(PipelineError::Stage {
                stage: StageName::Rendering,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_content_failure_settles_materialization_outcomes() {
        let mut coordinator = MockWorkerCoordinator::new();
        coordinator
            .expect_execute()
            .withf(|stage| stage.name == StageName::ContentSynthesis && stage.tasks.len() == 4)
            .times(1)
            .returning(|_| Err(ProviderError::Network("connection reset".to_string())));
        let mut renderer = MockImageRenderer::new();
        renderer.expect_render_image().times(0);

        let params = Parameters::from_form(
            "Australia",
            "Instagram",
            "Casual",
            "Adults",
            "",
            "None",
        );
        let report = orchestrator(coordinator, renderer).run(params).await;

        assert!(!report.is_success());
        // both enabled task groups share the failed invocation's fate
        assert!(matches!(
            report.stage_report(StageName::Research).unwrap().outcome,
            StageOutcome::Failed(_)
        ));
        assert!(matches!(
            report.stage_report(StageName::Campaign).unwrap().outcome,
            StageOutcome::Failed(_)
        ));
        assert_eq!(
            report.stage_report(StageName::ImageConcepting).unwrap().outcome,
            StageOutcome::Skipped
        );
    }

    #[tokio::test]
    async fn test_image_style_without_campaign_still_renders() {
        // research alone can produce ad copy, which unlocks the image
        // stage when a style is selected
        let mut coordinator = MockWorkerCoordinator::new();
        coordinator
            .expect_execute()
            .withf(|stage| stage.name == StageName::ContentSynthesis && stage.tasks.len() == 2)
            .times(1)
            .returning(|_| Ok("Research copy.".to_string()));
        coordinator
            .expect_execute()
            .withf(|stage| stage.name == StageName::ImageConcepting)
            .times(1)
            .returning(|_| Ok("A concept.".to_string()));

        let mut renderer = MockImageRenderer::new();
        renderer
            .expect_render_image()
            .times(1)
            .returning(|_, _| Ok(artifact("https://img.example/r.png")));

        let params = Parameters::from_form("Australia", "None", "None", "None", "", "Abstract");
        let report = orchestrator(coordinator, renderer).run(params).await;

        assert!(report.is_success());
        assert!(report.result.image.is_some());
        assert_eq!(
            report.stage_report(StageName::Campaign).unwrap().outcome,
            StageOutcome::Skipped
        );
    }

    #[tokio::test]
    async fn test_image_style_alone_runs_nothing() {
        // a style with no content stages produces no ad copy, so the
        // image stage cannot run either
        let mut coordinator = MockWorkerCoordinator::new();
        coordinator.expect_execute().times(0);
        let mut renderer = MockImageRenderer::new();
        renderer.expect_render_image().times(0);

        let params = Parameters::from_form("None", "None", "None", "None", "", "Abstract");
        let report = orchestrator(coordinator, renderer).run(params).await;

        assert!(report.is_success());
        assert!(report.result.is_empty());
        assert_eq!(
            report.stage_report(StageName::ImageConcepting).unwrap().outcome,
            StageOutcome::Skipped
        );
    }
}
