//! Configuration System
//!
//! Layered configuration for the model provider, pipeline defaults and
//! logging. Sources are merged by [`ConfigLoader`]: defaults, the global
//! config file, workspace config files, an explicit file, then environment
//! variables.

use crate::logging::LoggingConfig;
use crate::pipeline::DEFAULT_MAX_IMAGE_COUNT;
use crate::types::AspectRatio;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use crate::provider::ProviderConfig;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StylemixConfig {
    /// Model service settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Pipeline defaults
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_image_count() -> usize {
    1
}

fn default_max_image_count() -> usize {
    DEFAULT_MAX_IMAGE_COUNT
}

/// Pipeline defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Images generated per run when not specified
    #[serde(default = "default_image_count")]
    pub default_image_count: usize,

    /// Upper bound on images per run
    #[serde(default = "default_max_image_count")]
    pub max_image_count: usize,

    #[serde(default)]
    pub default_aspect_ratio: AspectRatio,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_image_count: default_image_count(),
            max_image_count: default_max_image_count(),
            default_aspect_ratio: AspectRatio::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_image_count == 0 {
            return Err("max_image_count must be at least 1".to_string());
        }
        if self.default_image_count == 0 || self.default_image_count > self.max_image_count {
            return Err(format!(
                "default_image_count {} is outside 1..={}",
                self.default_image_count, self.max_image_count
            ));
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Provider(String),
    Pipeline(String),
    Logging(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Provider(msg) => write!(f, "Provider: {}", msg),
            ValidationError::Pipeline(msg) => write!(f, "Pipeline: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl StylemixConfig {
    /// Validate the entire configuration, collecting every problem
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.provider.validate() {
            errors.push(ValidationError::Provider(e));
        }
        if let Err(e) = self.pipeline.validate() {
            errors.push(ValidationError::Pipeline(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Render as TOML with secrets hidden
    pub fn to_redacted_toml(&self) -> Result<String, crate::error::ApiError> {
        let mut copy = self.clone();
        copy.provider = copy.provider.redacted();
        toml::to_string_pretty(&copy).map_err(|e| {
            crate::error::ApiError::ConfigError(format!("Failed to render config: {}", e))
        })
    }
}
