//! Progress events emitted while a pipeline run advances.

use super::PipelineStage;
use crate::types::ProjectId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    Started {
        project_id: ProjectId,
        image_count: usize,
    },
    UsingCachedStyle {
        fingerprint: String,
    },
    AnalyzingReferences {
        total: usize,
    },
    SynthesizingStyle {
        descriptions: usize,
    },
    GeneratingImages {
        count: usize,
    },
    Completed {
        images: usize,
    },
    Failed {
        stage: Option<PipelineStage>,
    },
}

impl PipelineEvent {
    /// Status line for display
    pub fn message(&self) -> String {
        match self {
            PipelineEvent::Started { image_count, .. } => {
                format!("Starting generation of {} image(s)...", image_count)
            }
            PipelineEvent::UsingCachedStyle { .. } => "Using the remembered style...".to_string(),
            PipelineEvent::AnalyzingReferences { total } => format!(
                "Step 1/3: Analyzing the styles of {} reference image(s)...",
                total
            ),
            PipelineEvent::SynthesizingStyle { .. } => {
                "Step 2/3: Synthesizing a unified style description...".to_string()
            }
            PipelineEvent::GeneratingImages { count } => {
                format!("Step 3/3: Generating {} image(s)...", count)
            }
            PipelineEvent::Completed { images } => format!("Generated {} image(s).", images),
            PipelineEvent::Failed { stage: Some(stage) } => format!("Generation failed during {}.", stage),
            PipelineEvent::Failed { stage: None } => "Generation failed.".to_string(),
        }
    }
}

/// Receives progress events. Emission is best-effort.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: PipelineEvent);
}

impl ProgressSink for tokio::sync::mpsc::UnboundedSender<PipelineEvent> {
    fn emit(&self, event: PipelineEvent) {
        // A closed receiver only means nobody is listening.
        let _ = self.send(event);
    }
}
