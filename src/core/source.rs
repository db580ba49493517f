//! Source file identity.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::utils::path::normalize_path;

/// Canonical identity of a source document.
///
/// The only constructor normalizes the path, so two spellings of the same
/// physical file always produce equal identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(PathBuf);

impl SourceId {
    /// Canonicalize `path` into an identity.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(normalize_path(path.as_ref()))
    }

    /// Canonical path of the source file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File stem, used to name artifacts.
    pub fn stem(&self) -> &str {
        self.0
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("note")
    }
}

impl AsRef<Path> for SourceId {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.display().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_equal_for_different_spellings() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("notes")).unwrap();
        std::fs::write(dir.path().join("notes/a.md"), "").unwrap();

        let a = SourceId::new(dir.path().join("notes/a.md"));
        let b = SourceId::new(dir.path().join("notes/../notes/./a.md"));
        assert_eq!(a, b);
        assert!(a.path().is_absolute());
        assert_eq!(a.stem(), "a");
    }
}
