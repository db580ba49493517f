//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("settings file parsing error in `{0}`")]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("notes directory `{0}` does not exist or is not a directory")]
    NotesDirMissing(PathBuf),

    #[error("stylesheet `{0}` does not exist")]
    StyleMissing(PathBuf),

    #[error("converter `{0}` not found in PATH")]
    ConverterMissing(String),

    #[error("config validation error: {0}")]
    Validation(String),
}
