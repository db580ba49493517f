use std::path::PathBuf;

use thiserror::Error;

use crate::core::FileCategory;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// A coalesced, classified change ready to apply to shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct WatchEvent {
    pub(super) path: PathBuf,
    pub(super) kind: ChangeKind,
    pub(super) category: FileCategory,
}

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("file watcher error")]
    Notify(#[from] notify::Error),

    #[error("watch root `{0}` is gone, will re-attach when it returns")]
    RootLost(PathBuf),
}

impl WatchError {
    /// Whether the condition can clear up on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RootLost(_) => true,
            Self::Notify(err) => matches!(
                err.kind,
                notify::ErrorKind::PathNotFound | notify::ErrorKind::Io(_)
            ),
        }
    }
}
