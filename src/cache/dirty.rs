//! Identities changed since their last successful render.

use dashmap::DashSet;

use crate::core::SourceId;

/// Set of sources known to have changed since they were rendered.
///
/// The watcher inserts, the render coordinator removes, pollers only read.
#[derive(Debug, Default)]
pub struct DirtySet {
    ids: DashSet<SourceId>,
}

impl DirtySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&self, id: &SourceId) {
        if self.ids.insert(id.clone()) {
            crate::debug!("dirty"; "marked: {}", id);
        }
    }

    pub fn is_dirty(&self, id: &SourceId) -> bool {
        self.ids.contains(id)
    }

    pub fn clear_dirty(&self, id: &SourceId) {
        if self.ids.remove(id).is_some() {
            crate::debug!("dirty"; "cleared: {}", id);
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
