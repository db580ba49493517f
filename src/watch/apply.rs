use std::path::Path;

use super::types::{ChangeKind, WatchEvent};
use crate::config::ServeConfig;
use crate::core::{FileCategory, SharedState, SourceId};
use crate::logger::error_chain;

/// Apply classified events to the cache and dirty set.
///
/// - document modified: mark dirty, drop its artifact
/// - document removed: drop its artifact
/// - document created: nothing to invalidate yet
/// - stylesheet / settings written: reload once, drop every artifact on success
pub(super) fn apply_events(events: &[WatchEvent], config: &ServeConfig, state: &SharedState) {
    let mut reload_style = false;
    let mut reload_settings = false;

    for event in events {
        match (event.category, event.kind) {
            (FileCategory::Document, ChangeKind::Modified) => {
                let id = SourceId::new(&event.path);
                state.dirty.mark_dirty(&id);
                state.cache.invalidate(&id);
                crate::log!("watch"; "{}: {}", event.kind.label(), display(&event.path, config));
            }
            (FileCategory::Document, ChangeKind::Removed) => {
                state.cache.invalidate(&SourceId::new(&event.path));
                crate::log!("watch"; "{}: {}", event.kind.label(), display(&event.path, config));
            }
            (FileCategory::Document, ChangeKind::Created) => {
                crate::debug!("watch"; "{}: {}", event.kind.label(), display(&event.path, config));
            }
            (FileCategory::Style, ChangeKind::Removed)
            | (FileCategory::Settings, ChangeKind::Removed) => {
                crate::log!(
                    "watch";
                    "{} removed, keeping the loaded {}",
                    event.path.display(),
                    event.category.name()
                );
            }
            (FileCategory::Style, _) => reload_style = true,
            (FileCategory::Settings, _) => reload_settings = true,
            (FileCategory::Other, _) => {}
        }
    }

    if reload_style {
        match state.style.reload() {
            Ok(()) => {
                state.cache.clear_all();
                crate::log!("watch"; "stylesheet reloaded");
            }
            Err(err) => {
                crate::log!("error"; "{}, keeping previous stylesheet", error_chain(&err));
            }
        }
    }

    if reload_settings {
        match state.settings.reload() {
            Ok(settings) => {
                state.cache.clear_all();
                crate::log!(
                    "watch";
                    "settings reloaded: {} {}",
                    settings.convert.program,
                    settings.convert.flags.join(" ")
                );
            }
            Err(err) => {
                crate::log!("error"; "{}, keeping previous settings", error_chain(&err));
            }
        }
    }
}

fn display(path: &Path, config: &ServeConfig) -> String {
    path.strip_prefix(&config.notes_dir)
        .unwrap_or(path)
        .display()
        .to_string()
}
