//! Live converter settings with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic replacement, so a render
//! always sees one complete settings value even while the file reloads.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;

use super::{ConfigError, Settings};

/// Current settings plus what is needed to reload them.
pub struct SettingsHandle {
    path: Option<PathBuf>,
    cli_flags: Option<Vec<String>>,
    current: ArcSwap<Settings>,
}

impl SettingsHandle {
    /// Load the initial settings. Fails if the file exists but is invalid.
    pub fn load(path: Option<PathBuf>, cli_flags: Option<Vec<String>>) -> Result<Self, ConfigError> {
        let settings = Settings::load(path.as_deref(), cli_flags.as_deref())?;
        Ok(Self {
            path,
            cli_flags,
            current: ArcSwap::from_pointee(settings),
        })
    }

    /// Wrap fixed settings, with nothing to reload from.
    #[cfg(test)]
    pub fn fixed(settings: Settings) -> Self {
        Self {
            path: None,
            cli_flags: None,
            current: ArcSwap::from_pointee(settings),
        }
    }

    #[inline]
    pub fn get(&self) -> Arc<Settings> {
        self.current.load_full()
    }

    /// Settings file being tracked, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Re-read the settings file.
    ///
    /// On failure the previous settings stay in place.
    pub fn reload(&self) -> Result<Arc<Settings>, ConfigError> {
        let settings = Arc::new(Settings::load(
            self.path.as_deref(),
            self.cli_flags.as_deref(),
        )?);
        self.current.store(Arc::clone(&settings));
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reload_replaces_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("noteserve.toml");
        fs::write(&path, "[convert]\nflags = [\"--toc\"]\n").unwrap();

        let handle = SettingsHandle::load(Some(path.clone()), None).unwrap();
        assert_eq!(handle.get().convert.flags, ["--toc"]);

        fs::write(&path, "[convert]\nflags = [\"--mathjax\"]\n").unwrap();
        let reloaded = handle.reload().unwrap();
        assert_eq!(reloaded.convert.flags, ["--mathjax"]);
        assert_eq!(handle.get().convert.flags, ["--mathjax"]);
    }

    #[test]
    fn test_failed_reload_keeps_previous() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("noteserve.toml");
        fs::write(&path, "[convert]\nprogram = \"md2html\"\n").unwrap();

        let handle = SettingsHandle::load(Some(path.clone()), None).unwrap();
        fs::write(&path, "[convert\nbroken").unwrap();

        assert!(handle.reload().is_err());
        assert_eq!(handle.get().convert.program, "md2html");
    }

    #[test]
    fn test_cli_flags_survive_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("noteserve.toml");
        fs::write(&path, "").unwrap();

        let handle =
            SettingsHandle::load(Some(path.clone()), Some(vec!["--toc".into()])).unwrap();
        fs::write(&path, "[convert]\nflags = [\"--mathjax\"]\n").unwrap();

        assert_eq!(handle.reload().unwrap().convert.flags, ["--toc"]);
    }

    #[test]
    fn test_absent_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("noteserve.toml");

        let handle = SettingsHandle::load(Some(path.clone()), None).unwrap();
        assert_eq!(*handle.get(), Settings::default());

        fs::write(&path, "[convert]\ntimeout = 5\n").unwrap();
        assert_eq!(handle.reload().unwrap().convert.timeout, 5);
    }
}
