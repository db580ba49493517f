//! Converter settings, loaded from `noteserve.toml`.
//!
//! # Example
//!
//! ```toml
//! [convert]
//! program = "pandoc"          # converter executable
//! flags = ["--standalone"]    # passed before the input file
//! timeout = 30                # seconds before the converter is killed
//! ```
//!
//! Every key is optional. A missing file means defaults.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Settings that affect how a note is converted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub convert: ConvertSettings,
}

/// `[convert]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertSettings {
    /// Converter executable, looked up on `PATH`.
    pub program: String,

    /// Flags passed to the converter.
    pub flags: Vec<String>,

    /// Conversion timeout in seconds.
    pub timeout: u64,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            program: "pandoc".into(),
            flags: vec!["--standalone".into()],
            timeout: 30,
        }
    }
}

impl ConvertSettings {
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Settings {
    /// Load settings from `path` (defaults when `None`), then apply CLI flags.
    pub fn load(path: Option<&Path>, cli_flags: Option<&[String]>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        if let Some(flags) = cli_flags {
            settings.convert.flags = flags
                .iter()
                .filter(|f| !f.is_empty())
                .cloned()
                .collect();
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a settings file, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                crate::debug!("config"; "{} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => return Err(ConfigError::Io(path.to_path_buf(), err)),
        };

        let (settings, ignored) = Self::parse_with_ignored(&content)
            .map_err(|err| ConfigError::Toml(path.to_path_buf(), err))?;

        if !ignored.is_empty() {
            crate::log!("warning"; "unknown fields in {}, ignoring: {}", path.display(), ignored.join(", "));
        }

        Ok(settings)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), toml::de::Error> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let settings = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((settings, ignored))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.convert.program.trim().is_empty() {
            return Err(ConfigError::Validation(
                "[convert] program must not be empty".into(),
            ));
        }
        if self.convert.timeout == 0 {
            return Err(ConfigError::Validation(
                "[convert] timeout must be at least 1 second".into(),
            ));
        }
        Ok(())
    }
}
