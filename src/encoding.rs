//! Image payload encoding
//!
//! Turns raw image bytes, files on disk and `data:` URLs into the base64
//! [`ImagePayload`] sent to the model service, and back.

use crate::error::ApiError;
use crate::types::ImagePayload;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::path::Path;

/// Media type inferred from a file extension.
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

impl ImagePayload {
    /// Encode raw bytes. The media type must be an `image/*` type.
    pub fn from_bytes(bytes: &[u8], media_type: &str) -> Result<Self, ApiError> {
        let media_type = media_type.trim();
        if !media_type.starts_with("image/") {
            return Err(ApiError::InvalidPayload(format!(
                "Unsupported media type: {}",
                media_type
            )));
        }
        if bytes.is_empty() {
            return Err(ApiError::InvalidPayload("Image is empty".to_string()));
        }
        Ok(Self {
            data: BASE64.encode(bytes),
            media_type: media_type.to_string(),
        })
    }

    /// Read and encode an image file, inferring the media type from its extension.
    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        let media_type = media_type_for_path(path).ok_or_else(|| {
            ApiError::InvalidPayload(format!("Not a supported image file: {}", path.display()))
        })?;
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, media_type)
    }

    /// Split a `data:<media type>;base64,<data>` URL.
    pub fn from_data_url(url: &str) -> Result<Self, ApiError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| ApiError::InvalidPayload("Not a data URL".to_string()))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| ApiError::InvalidPayload("Data URL has no data section".to_string()))?;
        let media_type = header.strip_suffix(";base64").ok_or_else(|| {
            ApiError::InvalidPayload("Only base64 data URLs are supported".to_string())
        })?;
        if data.is_empty() {
            return Err(ApiError::InvalidPayload(
                "Could not extract base64 data from data URL".to_string(),
            ));
        }
        if !media_type.starts_with("image/") {
            return Err(ApiError::InvalidPayload(format!(
                "Unsupported media type: {}",
                media_type
            )));
        }
        Ok(Self {
            data: data.to_string(),
            media_type: media_type.to_string(),
        })
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }

    /// Decode the payload back into raw bytes
    pub fn decode(&self) -> Result<Vec<u8>, ApiError> {
        BASE64
            .decode(self.data.as_bytes())
            .map_err(|e| ApiError::InvalidPayload(format!("Invalid base64 data: {}", e)))
    }
}
