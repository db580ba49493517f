//! Unique artifact paths.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Directory holding every artifact this process produced.
///
/// Paths are never reused, so a reader holding an older path always sees a
/// complete file. Superseded artifacts stay until the directory is removed.
#[derive(Debug)]
pub struct ArtifactDir {
    root: PathBuf,
    seq: AtomicU64,
}

impl ArtifactDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            seq: AtomicU64::new(0),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<stem>.<nanos>-<seq>.html`, creating `root` if needed.
    pub fn next(&self, stem: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        Ok(self.root.join(format!("{stem}.{nanos}-{seq}.html")))
    }

    /// Delete the directory and everything in it. Missing is fine.
    pub fn remove(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.root) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
