//! Server configuration.
//!
//! - `ServeConfig` - static settings from the command line, fixed at startup
//! - `Settings` / `SettingsHandle` - converter settings from `noteserve.toml`,
//!   reloaded while serving

mod error;
mod handle;
mod settings;
mod util;

pub use error::ConfigError;
pub use handle::SettingsHandle;
pub use settings::{ConvertSettings, Settings};
use util::find_config_file;

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::core::FileCategory;
use crate::utils::path::{expand_path, normalize_path};

/// Default settings file name, searched upward from the cwd.
pub const SETTINGS_FILE: &str = "noteserve.toml";

/// Static serve configuration.
///
/// All paths are absolute and canonical, so they compare equal to the
/// paths the watcher reports.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub notes_dir: PathBuf,
    /// Lowercase, without the leading dot, in priority order.
    pub extensions: Vec<String>,
    pub css_file: Option<PathBuf>,
    pub settings_file: Option<PathBuf>,
    /// Per-process directory for rendered artifacts.
    pub artifact_dir: PathBuf,
    /// Browser poll interval in milliseconds.
    pub refresh_interval: u64,
    pub interface: IpAddr,
    pub port: u16,
    pub watch: bool,
    pub converter_flags: Option<Vec<String>>,
}

impl ServeConfig {
    /// Build and validate the configuration from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let notes_dir = expand_path(&cli.notes_dir);
        if !notes_dir.is_dir() {
            return Err(ConfigError::NotesDirMissing(notes_dir));
        }

        let css_file = match &cli.css {
            Some(css) => {
                let css = expand_path(css);
                if !css.is_file() {
                    return Err(ConfigError::StyleMissing(css));
                }
                Some(normalize_path(&css))
            }
            None => None,
        };

        let settings_file = match &cli.settings {
            Some(path) => Some(normalize_path(&expand_path(path))),
            None => std::env::current_dir()
                .ok()
                .map(|cwd| default_settings_file(&cwd)),
        };

        let extensions = normalize_extensions(&cli.extensions);
        if extensions.is_empty() {
            return Err(ConfigError::Validation(
                "at least one document extension is required".into(),
            ));
        }

        Ok(Self {
            notes_dir: normalize_path(&notes_dir),
            extensions,
            css_file,
            settings_file,
            artifact_dir: default_artifact_dir(),
            refresh_interval: cli.refresh_interval.max(1),
            interface: cli.interface,
            port: cli.port,
            watch: !cli.no_watch,
            converter_flags: cli.converter_flags.clone(),
        })
    }

    /// Whether `path` carries one of the document extensions.
    pub fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            })
    }

    /// Categorize a canonical path reported by the watcher.
    pub fn categorize(&self, path: &Path) -> FileCategory {
        if self.css_file.as_deref() == Some(path) {
            FileCategory::Style
        } else if self.settings_file.as_deref() == Some(path) {
            FileCategory::Settings
        } else if path.starts_with(&self.notes_dir) && self.is_document(path) {
            FileCategory::Document
        } else {
            FileCategory::Other
        }
    }
}

/// Nearest `noteserve.toml` at or above `cwd`, else `cwd/noteserve.toml`.
///
/// The fallback need not exist; it is watched, so creating it while serving
/// takes effect.
fn default_settings_file(cwd: &Path) -> PathBuf {
    let found = find_config_file(Path::new(SETTINGS_FILE), cwd);
    normalize_path(&found.unwrap_or_else(|| cwd.join(SETTINGS_FILE)))
}

/// `<temp>/noteserve-<pid>`
pub fn default_artifact_dir() -> PathBuf {
    std::env::temp_dir().join(format!("noteserve-{}", std::process::id()))
}

/// Lowercase, strip leading dots, drop empties and duplicates.
fn normalize_extensions(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for ext in raw {
        let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        if !ext.is_empty() && !out.contains(&ext) {
            out.push(ext);
        }
    }
    out
}

#[cfg(test)]
pub(crate) fn test_config(notes_dir: &Path) -> ServeConfig {
    ServeConfig {
        notes_dir: normalize_path(notes_dir),
        extensions: vec!["md".into(), "markdown".into(), "txt".into()],
        css_file: None,
        settings_file: None,
        artifact_dir: notes_dir.join(".artifacts"),
        refresh_interval: 500,
        interface: IpAddr::from([127, 0, 0, 1]),
        port: 5000,
        watch: true,
        converter_flags: None,
    }
}
