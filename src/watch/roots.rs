use std::path::{Path, PathBuf};

use notify::{RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

use super::types::WatchError;
use crate::config::ServeConfig;

/// A directory the watcher should observe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct WatchRoot {
    pub(super) path: PathBuf,
    pub(super) recursive: bool,
}

impl WatchRoot {
    fn mode(&self) -> RecursiveMode {
        if self.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        }
    }
}

/// Roots for a configuration: the notes tree, plus the directories holding
/// the stylesheet and the settings file when the tree does not cover them.
pub(super) fn roots_for(config: &ServeConfig) -> Vec<WatchRoot> {
    let mut roots = vec![WatchRoot {
        path: config.notes_dir.clone(),
        recursive: true,
    }];

    let singles = [config.css_file.as_deref(), config.settings_file.as_deref()];
    for dir in singles.into_iter().flatten().filter_map(Path::parent) {
        let covered = roots
            .iter()
            .any(|r| r.path == dir || (r.recursive && dir.starts_with(&r.path)));
        if !covered {
            roots.push(WatchRoot {
                path: dir.to_path_buf(),
                recursive: false,
            });
        }
    }

    roots
}

/// Watch-root consistency manager.
///
/// Responsibility:
/// - Attach existing roots at startup
/// - Detach roots whose directory disappeared
/// - Re-attach roots that were removed and recreated
pub(super) struct WatchRoots {
    desired: Vec<WatchRoot>,
    attached: FxHashSet<PathBuf>,
    warned_unwatched: bool,
}

impl WatchRoots {
    pub(super) fn new(roots: Vec<WatchRoot>) -> Self {
        Self {
            desired: roots,
            attached: FxHashSet::default(),
            warned_unwatched: false,
        }
    }

    /// Attach every root that exists now. Missing roots are retried later.
    pub(super) fn attach_existing<W: Watcher>(&mut self, watcher: &mut W) -> Result<(), WatchError> {
        for root in &self.desired {
            if !root.path.exists() {
                crate::log!("watch"; "{}", WatchError::RootLost(root.path.clone()));
                continue;
            }
            watcher.watch(&root.path, root.mode())?;
            self.attached.insert(root.path.clone());
            crate::debug!("watch"; "watching {}", root.path.display());
        }
        self.warn_if_unwatched();
        Ok(())
    }

    pub(super) fn maintain<W: Watcher>(&mut self, watcher: &mut W) {
        let lost: Vec<_> = self
            .attached
            .iter()
            .filter(|path| !path.exists())
            .cloned()
            .collect();
        for path in lost {
            watcher.unwatch(&path).ok();
            self.attached.remove(&path);
            crate::log!("watch"; "{}", WatchError::RootLost(path));
        }

        for root in &self.desired {
            if self.attached.contains(&root.path) || !root.path.exists() {
                continue;
            }

            match watcher.watch(&root.path, root.mode()) {
                Ok(()) => {
                    self.attached.insert(root.path.clone());
                    self.warned_unwatched = false;
                    crate::log!("watch"; "re-attached {}", root.path.display());
                }
                Err(err) => {
                    crate::debug!("watch"; "re-attach {} failed: {}", root.path.display(), err);
                }
            }
        }

        self.warn_if_unwatched();
    }

    #[cfg(test)]
    pub(super) fn is_attached(&self, path: &Path) -> bool {
        self.attached.contains(path)
    }

    fn warn_if_unwatched(&mut self) {
        if self.attached.is_empty() && !self.warned_unwatched {
            self.warned_unwatched = true;
            crate::log!("warning"; "no watch roots attached, changes are detected only on request");
        }
    }
}
