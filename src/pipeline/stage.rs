use std::fmt;

use serde::{Deserialize, Serialize};

use crate::personas::WorkerSpec;
use crate::prompts::TaskPrompt;

/// Names for the fixed pipeline stages. Research and Campaign only
/// materialize tasks; ContentSynthesis, ImageConcepting and Rendering
/// are the stages that actually invoke external capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageName {
    Research,
    Campaign,
    ContentSynthesis,
    ImageConcepting,
    Rendering,
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageName::Research => "research",
            StageName::Campaign => "campaign",
            StageName::ContentSynthesis => "content-synthesis",
            StageName::ImageConcepting => "image-concepting",
            StageName::Rendering => "rendering",
        };
        f.write_str(name)
    }
}

/// One unit of work handed to the coordinator: which worker does it,
/// what to do, and what a complete answer looks like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTask {
    pub worker_role: String,
    pub prompt: TaskPrompt,
}

impl StageTask {
    pub fn new(worker: &WorkerSpec, prompt: TaskPrompt) -> Self {
        Self {
            worker_role: worker.role.clone(),
            prompt,
        }
    }
}

/// An ordered group of tasks plus the workers participating in them,
/// submitted together as one coordinator invocation. Created, executed
/// exactly once, discarded after its output is captured.
#[derive(Debug, Clone)]
pub struct Stage {
    pub name: StageName,
    pub tasks: Vec<StageTask>,
    pub workers: Vec<WorkerSpec>,
}

impl Stage {
    pub fn new(name: StageName, tasks: Vec<StageTask>, workers: Vec<WorkerSpec>) -> Self {
        Self {
            name,
            tasks,
            workers,
        }
    }

    pub fn worker(&self, role: &str) -> Option<&WorkerSpec> {
        self.workers.iter().find(|w| w.role == role)
    }
}
