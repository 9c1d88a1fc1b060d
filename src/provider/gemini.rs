//! Gemini `generateContent` client.

use super::{build_provider_http_client, map_http_error, status_error, ProviderConfig, StyleModelClient};
use crate::credentials::ApiKey;
use crate::error::ApiError;
use crate::prompt::{synthesis_prompt, STYLE_ANALYSIS_PROMPT};
use crate::types::ImagePayload;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
    #[serde(rename = "inlineData", alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType", alias = "mime_type")]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or(&[])
    }

    fn text(&self) -> Option<String> {
        let text: String = self
            .first_parts()
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    fn image(&self) -> Option<ImagePayload> {
        self.first_parts()
            .iter()
            .filter_map(|part| part.inline_data.as_ref())
            .find(|inline| !inline.data.is_empty())
            .map(|inline| ImagePayload {
                data: inline.data.clone(),
                media_type: inline
                    .mime_type
                    .clone()
                    .unwrap_or_else(|| "image/png".to_string()),
            })
    }
}

/// Gemini provider client
pub struct GeminiClient {
    client: Client,
    api_base: String,
    analysis_model: String,
    image_model: String,
    api_key: ApiKey,
}

impl GeminiClient {
    pub fn new(config: &ProviderConfig, api_key: ApiKey) -> Result<Self, ApiError> {
        let client = build_provider_http_client(config)?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            analysis_model: config.analysis_model.clone(),
            image_model: config.image_model.clone(),
            api_key,
        })
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let model = model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }

    async fn generate_content(
        &self,
        model: &str,
        body: Value,
    ) -> Result<GenerateContentResponse, ApiError> {
        let url = self.endpoint_for_model(model);
        debug!(model, "Sending generateContent request");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_http_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(status.as_u16(), &error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::ProviderError(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl StyleModelClient for GeminiClient {
    async fn analyze_style(&self, image: &ImagePayload) -> Result<String, ApiError> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": image.media_type, "data": image.data } },
                    { "text": STYLE_ANALYSIS_PROMPT },
                ]
            }]
        });
        self.generate_content(&self.analysis_model, body)
            .await?
            .text()
            .ok_or_else(|| ApiError::ProviderError("No text in analysis response".to_string()))
    }

    async fn synthesize_style(&self, descriptions: &[String]) -> Result<String, ApiError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": synthesis_prompt(descriptions) }] }]
        });
        self.generate_content(&self.analysis_model, body)
            .await?
            .text()
            .ok_or_else(|| ApiError::ProviderError("No text in synthesis response".to_string()))
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImagePayload, ApiError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseModalities": ["IMAGE"] }
        });
        self.generate_content(&self.image_model, body)
            .await?
            .image()
            .ok_or(ApiError::MissingImageData)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}
