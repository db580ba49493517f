//! Resolve a URL path fragment to a note file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use crate::config::ServeConfig;

/// Find the note a request refers to.
///
/// Tried in order:
/// 1. `notes_dir/fragment` itself, if it is a document
/// 2. `notes_dir/fragment.<ext>` for each extension, if the fragment has none
/// 3. any document in the tree whose file stem equals the fragment
pub fn find_note(config: &ServeConfig, fragment: &str) -> Option<PathBuf> {
    if fragment.is_empty() {
        return None;
    }

    let full = config.notes_dir.join(fragment);
    if full.is_file() && config.is_document(&full) {
        return Some(full);
    }

    if full.extension().is_none()
        && let Some(found) = with_extensions(&full, &config.extensions)
    {
        return Some(found);
    }

    search_by_stem(config, fragment)
}

fn with_extensions(base: &Path, extensions: &[String]) -> Option<PathBuf> {
    extensions.iter().find_map(|ext| {
        let mut name = OsString::from(base.as_os_str());
        name.push(".");
        name.push(ext);
        let candidate = PathBuf::from(name);
        candidate.is_file().then_some(candidate)
    })
}

/// Walk the notes tree in sorted order, skipping hidden entries.
fn search_by_stem(config: &ServeConfig, stem: &str) -> Option<PathBuf> {
    WalkDir::new(&config.notes_dir)
        .sort(true)
        .skip_hidden(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .find(|path| {
            path.file_stem().and_then(|s| s.to_str()) == Some(stem) && config.is_document(path)
        })
}
