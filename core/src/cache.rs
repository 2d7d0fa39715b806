//! Content-addressed memoization for diff results
//!
//! Cache keys are fingerprints over the two datasets' content plus the key
//! selection, so a hit is observably identical to recomputation. Inputs are
//! immutable, so invalidation happens only by key change.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::row_diff::{self, RowDiffResult};
use std::collections::HashMap;

/// Memoizing wrapper around [`row_diff::diff`]
#[derive(Debug, Default)]
pub struct DiffCache {
    entries: HashMap<String, RowDiffResult>,
}

impl DiffCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff with memoization: repeated calls with identical dataset content
    /// and keys are served from the cache.
    pub fn diff(
        &mut self,
        base: &Dataset,
        current: &Dataset,
        keys: &[String],
    ) -> Result<RowDiffResult> {
        let cache_key = Self::cache_key(base, current, keys);
        if let Some(hit) = self.entries.get(&cache_key) {
            log::debug!("diff cache hit for {cache_key}");
            return Ok(hit.clone());
        }
        let result = row_diff::diff(base, current, keys)?;
        self.entries.insert(cache_key, result.clone());
        Ok(result)
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

    fn cache_key(base: &Dataset, current: &Dataset, keys: &[String]) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(base.fingerprint().as_bytes());
        hasher.update(current.fingerprint().as_bytes());
        hasher.update(&(keys.len() as u64).to_le_bytes());
        for key in keys {
            hasher.update(&(key.len() as u64).to_le_bytes());
            hasher.update(key.as_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}
