//! Synthesis Pipeline Orchestrator
//!
//! Runs one generation for the active project:
//!
//! 1. preconditions (credential, active project, references, prompt, count)
//! 2. style resolution: reuse the cached style when the fingerprint matches,
//!    otherwise analyze every reference concurrently and synthesize the
//!    ordered descriptions into one style
//! 3. prompt assembly
//! 4. concurrent generation of `image_count` images
//! 5. one atomic commit of history and cached style
//!
//! Both concurrent stages are fail-fast barriers: the first error drops the
//! remaining in-flight calls and nothing is committed.

use crate::credentials::{ApiKey, CredentialResolver};
use crate::error::PipelineError;
use crate::fingerprint::{compute_fingerprint, is_cache_valid, CachedStyle, StyleFingerprint};
use crate::project::Project;
use crate::prompt::assemble_prompt;
use crate::provider::{ClientFactory, StyleModelClient};
use crate::store::ProjectStore;
use crate::types::{AspectRatio, GeneratedImage, ReferenceImage};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

mod events;

pub use events::{PipelineEvent, ProgressSink};

/// Largest image count accepted unless configured otherwise
pub const DEFAULT_MAX_IMAGE_COUNT: usize = 4;

/// Remote stage of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    StyleAnalysis,
    StyleSynthesis,
    ImageGeneration,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::StyleAnalysis => "style analysis",
            PipelineStage::StyleSynthesis => "style synthesis",
            PipelineStage::ImageGeneration => "image generation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineRequest {
    pub image_count: usize,
    pub aspect_ratio: AspectRatio,
}

impl PipelineRequest {
    pub fn new(image_count: usize, aspect_ratio: AspectRatio) -> Self {
        Self {
            image_count,
            aspect_ratio,
        }
    }
}

impl Default for PipelineRequest {
    fn default() -> Self {
        Self::new(1, AspectRatio::default())
    }
}

pub struct PipelineOrchestrator {
    factory: Arc<dyn ClientFactory>,
    credentials: CredentialResolver,
    max_image_count: usize,
    progress: Option<Arc<dyn ProgressSink>>,
}

impl PipelineOrchestrator {
    pub fn new(factory: Arc<dyn ClientFactory>, credentials: CredentialResolver) -> Self {
        Self {
            factory,
            credentials,
            max_image_count: DEFAULT_MAX_IMAGE_COUNT,
            progress: None,
        }
    }

    pub fn with_max_image_count(mut self, max_image_count: usize) -> Self {
        self.max_image_count = max_image_count;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run the pipeline against the store's active project.
    ///
    /// On success the new images are returned and committed to the project
    /// together with the resolved style. On any failure the project is left
    /// exactly as it was.
    pub async fn run_pipeline(
        &self,
        store: &ProjectStore,
        request: PipelineRequest,
    ) -> Result<Vec<GeneratedImage>, PipelineError> {
        let (api_key, project) = self.check_preconditions(store, &request).map_err(|err| {
            warn!(error = %err, "Pipeline precondition failed");
            err
        })?;

        let _guard = store
            .begin_run(&project.id)
            .map_err(|_| PipelineError::RunInProgress(project.id.clone()))?;

        info!(
            project_id = %project.id,
            image_count = request.image_count,
            aspect_ratio = %request.aspect_ratio,
            references = project.reference_images.len(),
            "Pipeline started"
        );
        self.emit(PipelineEvent::Started {
            project_id: project.id.clone(),
            image_count: request.image_count,
        });

        match self.execute(&api_key, &project, request).await {
            Ok((images, style)) => {
                if let Err(err) = store.commit_run(&project.id, images.clone(), style) {
                    warn!(project_id = %project.id, error = %err, "Project changed during run; results not recorded");
                }
                info!(project_id = %project.id, images = images.len(), "Pipeline completed");
                self.emit(PipelineEvent::Completed {
                    images: images.len(),
                });
                Ok(images)
            }
            Err(err) => {
                let stage = err.failed_stage();
                error!(project_id = %project.id, stage = ?stage, error = %err, "Pipeline failed");
                self.emit(PipelineEvent::Failed { stage });
                Err(err)
            }
        }
    }

    fn check_preconditions(
        &self,
        store: &ProjectStore,
        request: &PipelineRequest,
    ) -> Result<(ApiKey, Project), PipelineError> {
        let api_key = self
            .credentials
            .resolve()
            .ok_or(PipelineError::MissingCredential)?;
        let project = store
            .active_project()
            .ok_or(PipelineError::NoActiveProject)?;
        if project.reference_images.is_empty() {
            return Err(PipelineError::NoReferenceImages);
        }
        if project.prompt.trim().is_empty() {
            return Err(PipelineError::EmptyPrompt);
        }
        if request.image_count == 0 || request.image_count > self.max_image_count {
            return Err(PipelineError::InvalidImageCount {
                requested: request.image_count,
                max: self.max_image_count,
            });
        }
        Ok((api_key, project))
    }

    async fn execute(
        &self,
        api_key: &ApiKey,
        project: &Project,
        request: PipelineRequest,
    ) -> Result<(Vec<GeneratedImage>, CachedStyle), PipelineError> {
        let client = self.factory.create_client(api_key)?;
        let fingerprint = compute_fingerprint(&project.reference_images);

        let description = self
            .resolve_style(client.as_ref(), project, &fingerprint)
            .await?;
        let prompt = assemble_prompt(request.aspect_ratio, &description, &project.prompt);
        debug!(project_id = %project.id, prompt = %prompt, "Generation prompt assembled");

        let images = self
            .generate_images(client.as_ref(), &prompt, request.image_count)
            .await?;

        Ok((
            images,
            CachedStyle {
                description,
                fingerprint,
            },
        ))
    }

    async fn resolve_style(
        &self,
        client: &dyn StyleModelClient,
        project: &Project,
        fingerprint: &StyleFingerprint,
    ) -> Result<String, PipelineError> {
        match project.cached_style.as_ref() {
            Some(cached) if is_cache_valid(project) => {
                info!(
                    project_id = %project.id,
                    fingerprint = %fingerprint.digest(),
                    "Style cache hit"
                );
                self.emit(PipelineEvent::UsingCachedStyle {
                    fingerprint: fingerprint.digest(),
                });
                return Ok(cached.description.clone());
            }
            _ => {}
        }

        info!(
            project_id = %project.id,
            fingerprint = %fingerprint.digest(),
            had_cached_style = project.cached_style.is_some(),
            "Style cache miss"
        );
        let descriptions = self
            .analyze_references(client, &project.reference_images)
            .await?;

        self.emit(PipelineEvent::SynthesizingStyle {
            descriptions: descriptions.len(),
        });
        client
            .synthesize_style(&descriptions)
            .await
            .map_err(|e| PipelineError::stage(PipelineStage::StyleSynthesis, e))
    }

    /// Analyze all references concurrently. Results keep reference order.
    async fn analyze_references(
        &self,
        client: &dyn StyleModelClient,
        images: &[ReferenceImage],
    ) -> Result<Vec<String>, PipelineError> {
        self.emit(PipelineEvent::AnalyzingReferences {
            total: images.len(),
        });
        try_join_all(images.iter().map(|image| client.analyze_style(&image.payload)))
            .await
            .map_err(|e| PipelineError::stage(PipelineStage::StyleAnalysis, e))
    }

    async fn generate_images(
        &self,
        client: &dyn StyleModelClient,
        prompt: &str,
        count: usize,
    ) -> Result<Vec<GeneratedImage>, PipelineError> {
        self.emit(PipelineEvent::GeneratingImages { count });
        let payloads = try_join_all((0..count).map(|_| client.generate_image(prompt)))
            .await
            .map_err(|e| PipelineError::stage(PipelineStage::ImageGeneration, e))?;
        Ok(payloads.into_iter().map(GeneratedImage::new).collect())
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(progress) = &self.progress {
            progress.emit(event);
        }
    }
}
