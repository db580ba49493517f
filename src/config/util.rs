//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Parent directories searched above the cwd for the settings file.
const MAX_PARENTS: usize = 3;

/// Find a settings file by searching upward from `start`
///
/// Checks `start` itself and up to three parent directories.
///
/// # Example
/// ```text
/// /home/user/notes/daily/     ← start
/// /home/user/noteserve.toml   ← found (two levels up)
/// ```
pub fn find_config_file(name: &Path, start: &Path) -> Option<PathBuf> {
    if name.is_absolute() {
        return name.is_file().then(|| name.to_path_buf());
    }

    start
        .ancestors()
        .take(MAX_PARENTS + 1)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_in_start_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("noteserve.toml"), "").unwrap();

        let found = find_config_file(Path::new("noteserve.toml"), dir.path());
        assert_eq!(found, Some(dir.path().join("noteserve.toml")));
    }

    #[test]
    fn test_find_in_parent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("noteserve.toml"), "").unwrap();

        let found = find_config_file(Path::new("noteserve.toml"), &nested);
        assert_eq!(found, Some(dir.path().join("noteserve.toml")));
    }

    #[test]
    fn test_search_depth_is_bounded() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c/d");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("noteserve.toml"), "").unwrap();

        assert!(find_config_file(Path::new("noteserve.toml"), &nested).is_none());
    }
}
