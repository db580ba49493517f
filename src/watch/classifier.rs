use std::path::PathBuf;

use rustc_hash::FxHashMap;

use super::types::{ChangeKind, WatchEvent};
use crate::cache::ArtifactCache;
use crate::config::ServeConfig;
use crate::core::{FileCategory, SourceId};

/// Turns debounced raw changes into events worth applying.
///
/// Pipeline: correct_by_existence → categorize → promote_replaced → sort
pub(super) struct EventClassifier;

impl EventClassifier {
    pub(super) fn classify(
        raw: FxHashMap<PathBuf, ChangeKind>,
        config: &ServeConfig,
        cache: &ArtifactCache,
    ) -> Vec<WatchEvent> {
        let mut changes = raw;
        Self::correct_by_existence(&mut changes);

        let mut events: Vec<_> = changes
            .into_iter()
            .filter_map(|(path, kind)| {
                // Directories come and go with their files; only files matter.
                if kind != ChangeKind::Removed && !path.is_file() {
                    return None;
                }
                let category = config.categorize(&path);
                if category == FileCategory::Other {
                    return None;
                }
                Some(WatchEvent {
                    kind: Self::promote_replaced(&path, kind, category, cache),
                    path,
                    category,
                })
            })
            .collect();

        events.sort_by(|a, b| a.path.cmp(&b.path));
        events
    }

    /// Reconcile event kinds with actual filesystem state.
    ///
    /// The watcher may report stale events (e.g., Created for a file that's already
    /// been deleted, or Removed for a file that still exists after an atomic save).
    pub(super) fn correct_by_existence(changes: &mut FxHashMap<PathBuf, ChangeKind>) {
        let paths: Vec<_> = changes.keys().cloned().collect();
        for path in paths {
            let kind = changes[&path];
            let exists = path.exists();
            match kind {
                ChangeKind::Created if !exists => {
                    crate::debug!("watch"; "discard created (gone): {}", path.display());
                    changes.remove(&path);
                }
                ChangeKind::Modified if !exists => {
                    crate::debug!("watch"; "upgrade modified->removed: {}", path.display());
                    changes.insert(path, ChangeKind::Removed);
                }
                ChangeKind::Removed if exists => {
                    crate::debug!("watch"; "downgrade removed->modified: {}", path.display());
                    changes.insert(path, ChangeKind::Modified);
                }
                _ => {}
            }
        }
    }

    /// A document created over one that is already cached was replaced
    /// (write-then-rename save), which is a modification.
    fn promote_replaced(
        path: &std::path::Path,
        kind: ChangeKind,
        category: FileCategory,
        cache: &ArtifactCache,
    ) -> ChangeKind {
        if kind == ChangeKind::Created
            && category == FileCategory::Document
            && cache.contains(&SourceId::new(path))
        {
            crate::debug!("watch"; "promote created->modified (replaced): {}", path.display());
            return ChangeKind::Modified;
        }
        kind
    }
}
