//! Style Fingerprint and Cache Validity
//!
//! A fingerprint is the sorted sequence of reference image identifiers. It is
//! the cache key for a synthesized style description: the cached description
//! may be reused only while the project's reference set has exactly the same
//! members, regardless of the order they were added in.

use crate::project::Project;
use crate::types::{ImageId, ReferenceImage};
use blake3::Hasher;
use serde::{Deserialize, Serialize};

/// Sorted reference image identifiers.
///
/// Always kept sorted, including after deserialization, so comparison is
/// insensitive to insertion order. Duplicated identifiers are preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<ImageId>", into = "Vec<ImageId>")]
pub struct StyleFingerprint(Vec<ImageId>);

impl StyleFingerprint {
    pub fn ids(&self) -> &[ImageId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short hex digest for logs and progress events
    pub fn digest(&self) -> String {
        let mut hasher = Hasher::new();
        for id in &self.0 {
            hasher.update(id.as_str().as_bytes());
            hasher.update(&[0u8]);
        }
        hex::encode(&hasher.finalize().as_bytes()[..6])
    }
}

impl From<Vec<ImageId>> for StyleFingerprint {
    fn from(mut ids: Vec<ImageId>) -> Self {
        ids.sort();
        StyleFingerprint(ids)
    }
}

impl From<StyleFingerprint> for Vec<ImageId> {
    fn from(fingerprint: StyleFingerprint) -> Self {
        fingerprint.0
    }
}

impl FromIterator<ImageId> for StyleFingerprint {
    fn from_iter<I: IntoIterator<Item = ImageId>>(iter: I) -> Self {
        StyleFingerprint::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/// A synthesized style description and the fingerprint it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedStyle {
    pub description: String,
    pub fingerprint: StyleFingerprint,
}

impl CachedStyle {
    /// True when `images` has exactly the members this style was derived from
    pub fn matches(&self, images: &[ReferenceImage]) -> bool {
        compute_fingerprint(images) == self.fingerprint
    }
}

/// Compute the fingerprint of a reference image set.
pub fn compute_fingerprint(images: &[ReferenceImage]) -> StyleFingerprint {
    images.iter().map(|image| image.id.clone()).collect()
}

/// Whether the project's cached style may be reused for its current reference set.
pub fn is_cache_valid(project: &Project) -> bool {
    project
        .cached_style
        .as_ref()
        .map(|cached| cached.matches(&project.reference_images))
        .unwrap_or(false)
}
