//! Credential resolution
//!
//! The pipeline needs an API key before it may contact the model service.
//! Keys come from the environment first, then from configuration.

use crate::error::ApiError;
use std::fmt;

/// Environment variables checked in order
pub const CREDENTIAL_ENV_VARS: [&str; 3] = ["STYLEMIX_API_KEY", "GEMINI_API_KEY", "API_KEY"];

/// A non-empty, trimmed API key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ApiError::ConfigError("API key cannot be empty".to_string()));
        }
        Ok(ApiKey(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Where a resolved key came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Environment(String),
    Configured,
}

#[derive(Debug, Clone)]
pub struct CredentialResolver {
    env_vars: Vec<String>,
    configured: Option<String>,
}

impl CredentialResolver {
    /// Check the standard environment variables, then `configured`
    pub fn new(configured: Option<String>) -> Self {
        Self {
            env_vars: CREDENTIAL_ENV_VARS.iter().map(|s| s.to_string()).collect(),
            configured,
        }
    }

    /// Use only the given key, ignoring the environment
    pub fn fixed(key: impl Into<String>) -> Self {
        Self {
            env_vars: Vec::new(),
            configured: Some(key.into()),
        }
    }

    /// Never resolve a key
    pub fn none() -> Self {
        Self {
            env_vars: Vec::new(),
            configured: None,
        }
    }

    pub fn resolve(&self) -> Option<ApiKey> {
        self.resolve_with_source().map(|(key, _)| key)
    }

    pub fn resolve_with_source(&self) -> Option<(ApiKey, CredentialSource)> {
        for var in &self.env_vars {
            if let Some(key) = std::env::var(var).ok().and_then(|v| ApiKey::parse(&v).ok()) {
                return Some((key, CredentialSource::Environment(var.clone())));
            }
        }
        self.configured
            .as_deref()
            .and_then(|raw| ApiKey::parse(raw).ok())
            .map(|key| (key, CredentialSource::Configured))
    }
}
