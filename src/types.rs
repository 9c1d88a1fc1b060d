//! Core types shared by the fingerprint layer, the project store and the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identifier of a reference or generated image.
///
/// Ordering is lexicographic over the string form, which gives fingerprints a
/// total, deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        ImageId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ImageId {
    fn from(value: &str) -> Self {
        ImageId(value.to_string())
    }
}

impl From<String> for ImageId {
    fn from(value: String) -> Self {
        ImageId(value)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a project.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new() -> Self {
        ProjectId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        ProjectId(value.to_string())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Base64 image content plus its media type, as sent to and received from the model service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    /// Standard-alphabet base64 of the raw image bytes
    pub data: String,
    /// Media type, e.g. `image/png`
    pub media_type: String,
}

/// An image the project's style is derived from. Owned by its project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceImage {
    pub id: ImageId,
    pub payload: ImagePayload,
}

impl ReferenceImage {
    /// Wrap a payload under a fresh identifier
    pub fn new(payload: ImagePayload) -> Self {
        Self {
            id: ImageId::new(),
            payload,
        }
    }

    pub fn with_id(id: impl Into<ImageId>, payload: ImagePayload) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }
}

/// An image produced by a successful generation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: ImageId,
    pub payload: ImagePayload,
}

impl GeneratedImage {
    pub fn new(payload: ImagePayload) -> Self {
        Self {
            id: ImageId::new(),
            payload,
        }
    }

    /// File name used when saving the image to disk
    pub fn file_name(&self) -> String {
        let extension = match self.payload.media_type.as_str() {
            "image/jpeg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "png",
        };
        format!("stylemix-{}.{}", self.id, extension)
    }
}

/// Aspect ratio requested for generated images
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    Portrait,
    #[default]
    Square,
    Landscape,
}

impl AspectRatio {
    /// Textual ratio label placed in the generation prompt
    pub fn label(self) -> &'static str {
        match self {
            AspectRatio::Portrait => "9:16",
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AspectRatio::Portrait => "portrait",
            AspectRatio::Square => "square",
            AspectRatio::Landscape => "landscape",
        };
        f.write_str(name)
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" | "9:16" => Ok(AspectRatio::Portrait),
            "square" | "1:1" => Ok(AspectRatio::Square),
            "landscape" | "16:9" => Ok(AspectRatio::Landscape),
            other => Err(format!(
                "Invalid aspect ratio: {} (must be 'portrait', 'square' or 'landscape')",
                other
            )),
        }
    }
}
