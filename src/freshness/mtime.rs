//! Mtime-based freshness detection for rendered artifacts.
//!
//! An artifact records the modification time its source had when the
//! converter read it. The artifact stays fresh while the source's current
//! mtime has not advanced past that recorded value.

use std::path::Path;
use std::time::SystemTime;

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Check whether `source` is unchanged since `recorded`.
///
/// Returns `true` if the source exists and its current mtime is `<= recorded`.
/// A missing or unreadable source is never unchanged.
pub fn is_source_unchanged(source: &Path, recorded: SystemTime) -> bool {
    get_mtime(source).is_some_and(|current| current <= recorded)
}
