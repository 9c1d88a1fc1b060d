//! Project aggregate
//!
//! A project groups the reference images, the content prompt, the bounded
//! generation history and the cached style description.

use crate::fingerprint::{compute_fingerprint, is_cache_valid, CachedStyle, StyleFingerprint};
use crate::types::{GeneratedImage, ImageId, ProjectId, ReferenceImage};
use serde::{Deserialize, Serialize};

/// Maximum number of generated images kept per project
pub const HISTORY_LIMIT: usize = 20;

/// Most-recent-first generated images, capped at [`HISTORY_LIMIT`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<GeneratedImage>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a batch in front of the existing entries, keeping the batch's own
    /// order, and evict the oldest entries beyond the cap.
    pub fn prepend(&mut self, batch: Vec<GeneratedImage>) {
        let mut entries = batch;
        entries.append(&mut self.entries);
        entries.truncate(HISTORY_LIMIT);
        self.entries = entries;
    }

    pub fn entries(&self) -> &[GeneratedImage] {
        &self.entries
    }

    pub fn get(&self, id: &ImageId) -> Option<&GeneratedImage> {
        self.entries.iter().find(|image| &image.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub reference_images: Vec<ReferenceImage>,
    pub history: History,
    pub prompt: String,
    pub cached_style: Option<CachedStyle>,
}

impl Project {
    /// Create an empty project
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            reference_images: Vec::new(),
            history: History::new(),
            prompt: String::new(),
            cached_style: None,
        }
    }

    pub fn fingerprint(&self) -> StyleFingerprint {
        compute_fingerprint(&self.reference_images)
    }

    pub fn has_valid_cache(&self) -> bool {
        is_cache_valid(self)
    }
}
