//! Artifact cache keyed by source identity.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use dashmap::DashMap;

use crate::core::SourceId;
use crate::freshness::is_source_unchanged;

/// A rendered artifact and the source mtime it was produced from.
///
/// Entries are replaced wholesale, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub source: SourceId,
    pub artifact: PathBuf,
    /// Source mtime at render time, not the artifact's own mtime.
    pub source_mtime: SystemTime,
}

impl CacheEntry {
    /// Servable iff the artifact still exists and the source has not advanced.
    pub fn is_valid(&self) -> bool {
        self.artifact.is_file() && is_source_unchanged(self.source.path(), self.source_mtime)
    }
}

/// Mapping from source identity to its last rendered artifact.
///
/// Sharded (`DashMap`), so different identities never contend and no lock is
/// held across a conversion. Unbounded: entries leave only on invalidation.
#[derive(Debug, Default)]
pub struct ArtifactCache {
    entries: DashMap<SourceId, CacheEntry>,
    /// Bumped by every `clear_all`.
    generation: AtomicU64,
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the entry for `id` if it is still valid.
    ///
    /// Invalid entries are reported as a miss but left in place; the next
    /// `store` or `invalidate` replaces them.
    pub fn lookup(&self, id: &SourceId) -> Option<CacheEntry> {
        // Clone out of the shard before touching the filesystem.
        let entry = self.entries.get(id).map(|e| e.value().clone())?;
        if entry.is_valid() {
            crate::debug!("cache"; "hit: {}", id);
            Some(entry)
        } else {
            crate::debug!("cache"; "stale: {}", id);
            None
        }
    }

    /// Replace any existing entry for `id`.
    pub fn store(&self, id: SourceId, artifact: &Path, source_mtime: SystemTime) {
        let entry = CacheEntry {
            source: id.clone(),
            artifact: artifact.to_path_buf(),
            source_mtime,
        };
        self.entries.insert(id, entry);
    }

    /// Current clear generation. Read it before loading the style and settings
    /// a render depends on, and hand it back to [`store_if_current`].
    ///
    /// [`store_if_current`]: Self::store_if_current
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Store unless `clear_all` ran since `generation` was read.
    ///
    /// Returns whether the entry was kept. The generation is checked again
    /// after inserting, so a clear racing with the insert still wins.
    pub fn store_if_current(
        &self,
        id: SourceId,
        artifact: &Path,
        source_mtime: SystemTime,
        generation: u64,
    ) -> bool {
        if self.generation() != generation {
            return false;
        }
        self.store(id.clone(), artifact, source_mtime);
        if self.generation() == generation {
            return true;
        }
        self.entries.remove_if(&id, |_, entry| entry.artifact == artifact);
        false
    }

    /// Remove the entry for `id`. No-op when absent.
    pub fn invalidate(&self, id: &SourceId) -> bool {
        let removed = self.entries.remove(id).is_some();
        if removed {
            crate::debug!("cache"; "invalidated: {}", id);
        }
        removed
    }

    /// Whether an entry exists for `id`, valid or not.
    pub fn contains(&self, id: &SourceId) -> bool {
        self.entries.contains_key(id)
    }

    /// Drop every entry.
    pub fn clear_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let count = self.entries.len();
        self.entries.clear();
        crate::debug!("cache"; "cleared {} entries", count);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
