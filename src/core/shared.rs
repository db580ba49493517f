//! State shared between the request handlers and the watcher.

use std::sync::Arc;

use crate::cache::{ArtifactCache, DirtySet};
use crate::config::SettingsHandle;
use crate::render::StyleSheet;

/// Everything both sides of the server touch.
///
/// Constructed once in `main` and handed around as `Arc<SharedState>`;
/// each field synchronizes itself, so no outer lock is needed.
pub struct SharedState {
    pub cache: ArtifactCache,
    pub dirty: DirtySet,
    pub style: StyleSheet,
    pub settings: SettingsHandle,
}

impl SharedState {
    pub fn new(style: StyleSheet, settings: SettingsHandle) -> Arc<Self> {
        Arc::new(Self {
            cache: ArtifactCache::new(),
            dirty: DirtySet::new(),
            style,
            settings,
        })
    }
}
