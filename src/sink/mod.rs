use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::pipeline::PipelineResult;

/// Handle to a persisted result file. Downloads are served from this
/// copy; the content is never re-derived from the pipeline result.
#[derive(Debug, Clone)]
pub struct PersistedArtifact {
    pub path: PathBuf,
    pub created: DateTime<Utc>,
    pub size: u64,
}

#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Write the result to durable storage, once.
    async fn persist(&self, result: &PipelineResult) -> Result<PersistedArtifact>;

    /// Serve the persisted bytes for download.
    async fn open_download(&self, artifact: &PersistedArtifact) -> Result<Vec<u8>>;
}

/// Render the user-facing text block for a result. Missing sections are
/// omitted, not written as empty placeholders.
pub fn render_display(result: &PipelineResult) -> String {
    let mut display = String::from("Here is the result\n");
    if let Some(copy) = &result.ad_copy {
        display.push_str("\nYour post copy:\n");
        display.push_str(copy);
        display.push('\n');
    }
    if let Some(image) = &result.image {
        display.push_str("\nYour generated image:\n");
        display.push_str(&image.url);
        display.push('\n');
    }
    display
}

fn format_content(result: &PipelineResult) -> String {
    let mut content = String::new();
    if let Some(copy) = &result.ad_copy {
        content.push_str("Ad Copy:\n");
        content.push_str(copy);
        content.push_str("\n\n");
    }
    if let Some(image) = &result.image {
        content.push_str(&format!("Generated Image URL: {}\n", image.url));
    }
    content
}

pub struct FileResultSink {
    output_dir: PathBuf,
}

impl FileResultSink {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    fn file_path(&self, timestamp: DateTime<Utc>) -> PathBuf {
        let filename = format!(
            "generated_content_{}.txt",
            timestamp.format("%Y-%m-%d_%H-%M-%S")
        );
        self.output_dir.join(filename)
    }
}

#[async_trait]
impl ResultSink for FileResultSink {
    async fn persist(&self, result: &PipelineResult) -> Result<PersistedArtifact> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            PipelineError::Persistence(format!("Failed to create output directory: {}", e))
        })?;

        let path = self.file_path(result.created_at);
        let content = format_content(result);

        debug!("Persisting result {} to {:?}", result.run_id, path);
        fs::write(&path, content.as_bytes())
            .map_err(|e| PipelineError::Persistence(format!("Failed to write result: {}", e)))?;

        let size = fs::metadata(&path)
            .map_err(|e| PipelineError::Persistence(format!("Failed to stat result: {}", e)))?
            .len();

        info!("Persisted result {} ({} bytes)", result.run_id, size);
        Ok(PersistedArtifact {
            path,
            created: Utc::now(),
            size,
        })
    }

    async fn open_download(&self, artifact: &PersistedArtifact) -> Result<Vec<u8>> {
        // serve from the persisted copy, never re-derive
        fs::read(&artifact.path)
            .map_err(|e| PipelineError::Persistence(format!("Failed to read artifact: {}", e)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ImageArtifact;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn result_with(ad_copy: Option<&str>, image_url: Option<&str>) -> PipelineResult {
        PipelineResult {
            run_id: Uuid::new_v4(),
            ad_copy: ad_copy.map(str::to_string),
            image: image_url.map(|url| ImageArtifact {
                url: url.to_string(),
                revised_prompt: None,
            }),
            created_at: "2024-01-15T10:30:45Z".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_persist_file_naming() {
        let temp_dir = tempdir().unwrap();
        let sink = FileResultSink::new(temp_dir.path().to_path_buf());

        let result = result_with(Some("Visit Australia safely!"), None);
        let artifact = sink.persist(&result).await.unwrap();

        assert_eq!(
            artifact.path,
            temp_dir.path().join("generated_content_2024-01-15_10-30-45.txt")
        );
        assert!(artifact.path.exists());
    }

    #[tokio::test]
    async fn test_persisted_sections_in_order() {
        let temp_dir = tempdir().unwrap();
        let sink = FileResultSink::new(temp_dir.path().to_path_buf());

        let result = result_with(
            Some("Visit Australia safely!"),
            Some("https://img.example/a.png"),
        );
        let artifact = sink.persist(&result).await.unwrap();

        let content = std::fs::read_to_string(&artifact.path).unwrap();
        let copy_pos = content.find("Ad Copy:\nVisit Australia safely!").unwrap();
        let image_pos = content
            .find("Generated Image URL: https://img.example/a.png")
            .unwrap();
        assert!(copy_pos < image_pos);
    }

    #[tokio::test]
    async fn test_missing_sections_are_omitted() {
        let temp_dir = tempdir().unwrap();
        let sink = FileResultSink::new(temp_dir.path().to_path_buf());

        // ad copy only
        let artifact = sink
            .persist(&result_with(Some("Copy only."), None))
            .await
            .unwrap();
        let content = std::fs::read_to_string(&artifact.path).unwrap();
        assert!(content.contains("Ad Copy:"));
        assert!(!content.contains("Generated Image URL"));
    }

    #[tokio::test]
    async fn test_download_serves_persisted_copy() {
        let temp_dir = tempdir().unwrap();
        let sink = FileResultSink::new(temp_dir.path().to_path_buf());

        let result = result_with(Some("Visit Australia safely!"), None);
        let artifact = sink.persist(&result).await.unwrap();

        // mutate the persisted file; the download must reflect the copy
        std::fs::write(&artifact.path, b"edited on disk").unwrap();
        let bytes = sink.open_download(&artifact).await.unwrap();
        assert_eq!(bytes, b"edited on disk");
    }

    #[test]
    fn test_render_display() {
        let full = result_with(Some("Copy."), Some("https://img.example/a.png"));
        let display = render_display(&full);
        assert!(display.contains("Your post copy:"));
        assert!(display.contains("Your generated image:"));

        let empty = result_with(None, None);
        let display = render_display(&empty);
        assert!(!display.contains("Your post copy:"));
        assert!(!display.contains("Your generated image:"));
    }
}
