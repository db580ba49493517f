//! Path normalization utilities.
//!
//! Every path used as a cache or dirty-set key goes through
//! [`normalize_path`], so one physical file maps to exactly one key.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Canonical parent joined with the file name (deleted files)
/// - Return as-is if already absolute
/// - Join with current directory if relative
///
/// The parent fallback matters for removal events: the file is gone, but its
/// directory still canonicalizes to the same prefix the key was stored under.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    if let (Some(parent), Some(name)) = (path.parent(), path.file_name())
        && let Ok(parent) = parent.canonicalize()
    {
        return parent.join(name);
    }

    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    }
}

/// Expand `~` and normalize a user-supplied path.
///
/// # Example
/// ```ignore
/// let notes = expand_path(Path::new("~/notes"));
/// ```
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::tilde(raw.as_ref()).into_owned();
    normalize_path(Path::new(&expanded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_same_key_for_dot_segments() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("notes")).unwrap();
        std::fs::write(dir.path().join("notes/a.md"), "# a").unwrap();

        let direct = normalize_path(&dir.path().join("notes/a.md"));
        let dotted = normalize_path(&dir.path().join("notes/./../notes/a.md"));
        assert_eq!(direct, dotted);
    }

    #[test]
    fn test_normalize_path_deleted_file_keeps_key() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("gone.md");
        std::fs::write(&file, "x").unwrap();
        let before = normalize_path(&file);

        std::fs::remove_file(&file).unwrap();
        assert_eq!(normalize_path(&file), before);
    }

    #[test]
    fn test_expand_path_tilde() {
        let expanded = expand_path(Path::new("~/notes"));
        assert!(expanded.is_absolute());
        assert!(!expanded.to_string_lossy().contains('~'));
    }
}
