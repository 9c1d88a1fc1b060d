//! Model Provider Abstraction
//!
//! The three remote operations the pipeline depends on (per-image style
//! analysis, cross-image style synthesis, image generation) behind one client
//! trait, plus the factory that builds a client once a credential is known.

use crate::credentials::ApiKey;
use crate::error::ApiError;
use crate::types::ImagePayload;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

mod gemini;

pub use gemini::GeminiClient;

/// Model service client trait
#[async_trait]
pub trait StyleModelClient: Send + Sync {
    /// Describe the artistic style of a single image
    async fn analyze_style(&self, image: &ImagePayload) -> Result<String, ApiError>;

    /// Merge ordered per-image descriptions into one style description
    async fn synthesize_style(&self, descriptions: &[String]) -> Result<String, ApiError>;

    /// Generate exactly one image for the prompt
    async fn generate_image(&self, prompt: &str) -> Result<ImagePayload, ApiError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

/// Builds clients for a resolved credential
pub trait ClientFactory: Send + Sync {
    fn create_client(&self, api_key: &ApiKey) -> Result<Arc<dyn StyleModelClient>, ApiError>;
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_analysis_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    120
}

/// Model service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the generative language API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Text model used for analysis and synthesis
    #[serde(default = "default_analysis_model")]
    pub analysis_model: String,

    /// Image-output model used for generation
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// API key; environment variables take precedence
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            analysis_model: default_analysis_model(),
            image_model: default_image_model(),
            api_key: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.analysis_model.trim().is_empty() {
            return Err("Analysis model cannot be empty".to_string());
        }
        if self.image_model.trim().is_empty() {
            return Err("Image model cannot be empty".to_string());
        }
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(format!("Invalid API base URL: {}", self.api_base));
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err("Timeouts must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Copy with the API key hidden, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.api_key.is_some() {
            copy.api_key = Some("***".to_string());
        }
        copy
    }
}

// Map transport-level HTTP errors to ApiError
fn map_http_error(error: reqwest::Error) -> ApiError {
    if let Some(status) = error.status() {
        status_error(status.as_u16(), &error.to_string())
    } else if error.is_timeout() {
        ApiError::ProviderRequestFailed(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ApiError::ProviderRequestFailed(format!("Connection error: {}", error))
    } else {
        ApiError::ProviderError(format!("HTTP error: {}", error))
    }
}

// Map a non-success status and its body to ApiError
fn status_error(status: u16, detail: &str) -> ApiError {
    match status {
        401 | 403 => ApiError::ProviderAuthFailed(format!("Authentication failed: {}", detail)),
        429 => ApiError::ProviderRateLimit(format!("Rate limit exceeded: {}", detail)),
        404 => ApiError::ProviderModelNotFound(format!("Model not found: {}", detail)),
        _ => ApiError::ProviderRequestFailed(format!(
            "Request failed with status {}: {}",
            status, detail
        )),
    }
}

fn build_provider_http_client(config: &ProviderConfig) -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| ApiError::ProviderError(format!("Failed to create HTTP client: {}", e)))
}

/// Factory for Gemini clients
#[derive(Debug, Clone, Default)]
pub struct GeminiClientFactory {
    config: ProviderConfig,
}

impl GeminiClientFactory {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }
}

impl ClientFactory for GeminiClientFactory {
    fn create_client(&self, api_key: &ApiKey) -> Result<Arc<dyn StyleModelClient>, ApiError> {
        Ok(Arc::new(GeminiClient::new(&self.config, api_key.clone())?))
    }
}
