//! Error types for the style synthesis pipeline.

use crate::pipeline::PipelineStage;
use crate::types::{ImageId, ProjectId};
use thiserror::Error;

/// Project store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    #[error("Reference image not found: {0}")]
    ReferenceImageNotFound(ImageId),

    #[error("Generated image not found: {0}")]
    GeneratedImageNotFound(ImageId),

    #[error("A pipeline run is already in progress for project {0}")]
    RunInProgress(ProjectId),

    #[error("Invalid project name: {0}")]
    InvalidName(String),
}

/// Provider, payload and configuration errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Provider request failed: {0}")]
    ProviderRequestFailed(String),

    #[error("Provider authentication failed: {0}")]
    ProviderAuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("Provider model not found: {0}")]
    ProviderModelNotFound(String),

    #[error("No image data found in provider response")]
    MissingImageData,

    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Failure of one pipeline invocation.
///
/// Precondition variants are detected locally before any remote call. Stage
/// failures carry the underlying provider error, which is logged but not shown
/// to the user.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No API credential is configured")]
    MissingCredential,

    #[error("No active project")]
    NoActiveProject,

    #[error("Project has no reference images")]
    NoReferenceImages,

    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("Image count {requested} is outside 1..={max}")]
    InvalidImageCount { requested: usize, max: usize },

    #[error("A pipeline run is already in progress for project {0}")]
    RunInProgress(ProjectId),

    #[error("{stage} failed: {source}")]
    StageFailed {
        stage: PipelineStage,
        #[source]
        source: ApiError,
    },

    #[error("Provider unavailable: {0}")]
    Provider(#[from] ApiError),
}

impl PipelineError {
    pub fn stage(stage: PipelineStage, source: ApiError) -> Self {
        PipelineError::StageFailed { stage, source }
    }

    /// Remote stage that failed, if any
    pub fn failed_stage(&self) -> Option<PipelineStage> {
        match self {
            PipelineError::StageFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// True for failures detected before any remote call was made.
    pub fn is_precondition(&self) -> bool {
        !matches!(
            self,
            PipelineError::StageFailed { .. } | PipelineError::Provider(_)
        )
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::MissingCredential => {
                "The API key is not configured. Please set it and try again.".to_string()
            }
            PipelineError::NoActiveProject => "No active project is selected.".to_string(),
            PipelineError::NoReferenceImages => {
                "Please add at least one reference image.".to_string()
            }
            PipelineError::EmptyPrompt => "Please enter a prompt.".to_string(),
            PipelineError::InvalidImageCount { max, .. } => {
                format!("Please choose between 1 and {} images.", max)
            }
            PipelineError::RunInProgress(_) => {
                "Generation is already running for this project.".to_string()
            }
            PipelineError::StageFailed { stage, .. } => match stage {
                PipelineStage::StyleAnalysis => {
                    "Failed to analyze the style of the reference images.".to_string()
                }
                PipelineStage::StyleSynthesis => "Failed to synthesize the style.".to_string(),
                PipelineStage::ImageGeneration => "Failed to generate the images.".to_string(),
            },
            PipelineError::Provider(_) => "The image service is unavailable.".to_string(),
        }
    }
}
