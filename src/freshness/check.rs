//! Freshness query answered to polling browsers.

use crate::core::{SharedState, SourceId};

/// Whether `id` changed since it was last rendered.
///
/// Read-only: the flag clears only when the note is actually re-rendered,
/// so a page keeps seeing `true` until it reloads.
#[inline]
pub fn is_modified(state: &SharedState, id: &SourceId) -> bool {
    state.dirty.is_dirty(id)
}
