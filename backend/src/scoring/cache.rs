//! Content-addressed cache of recognizer output
//!
//! Identical images are recognized once: results are keyed by the SHA-256 of
//! the submitted image bytes. The cache belongs to the surrounding
//! application; the settlement engine never touches it.

use super::detection::Detection;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Hex SHA-256 of raw image bytes
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone, Default)]
pub struct DetectionCache {
    entries: HashMap<String, Vec<Detection>>,
}

impl DetectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, image: &[u8]) -> Option<&[Detection]> {
        self.entries.get(&content_hash(image)).map(Vec::as_slice)
    }

    /// Cached detections for `image`, running `recognize` only on a miss
    pub fn get_or_insert_with<F>(&mut self, image: &[u8], recognize: F) -> &[Detection]
    where
        F: FnOnce(&[u8]) -> Vec<Detection>,
    {
        self.entries
            .entry(content_hash(image))
            .or_insert_with(|| recognize(image))
    }

    pub fn invalidate(&mut self, image: &[u8]) -> bool {
        self.entries.remove(&content_hash(image)).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
