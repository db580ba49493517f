//! Stylesheet embedded into every artifact.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("failed to read stylesheet `{0}`")]
    Io(PathBuf, #[source] std::io::Error),
}

/// Process-wide style content, replaced wholesale on reload.
#[derive(Debug, Default)]
pub struct StyleSheet {
    path: Option<PathBuf>,
    content: ArcSwapOption<String>,
}

impl StyleSheet {
    /// Load the stylesheet at `path`, or hold nothing when `None`.
    pub fn load(path: Option<PathBuf>) -> Result<Self, StyleError> {
        let sheet = Self {
            path,
            content: ArcSwapOption::empty(),
        };
        if sheet.path.is_some() {
            sheet.reload()?;
        }
        Ok(sheet)
    }

    /// Fixed content, with no file behind it.
    #[cfg(test)]
    pub fn from_content(css: impl Into<String>) -> Self {
        Self {
            path: None,
            content: ArcSwapOption::from_pointee(css.into()),
        }
    }

    #[inline]
    pub fn get(&self) -> Option<Arc<String>> {
        self.content.load_full()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Re-read the file. On failure the previous content is kept.
    pub fn reload(&self) -> Result<(), StyleError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let css = fs::read_to_string(path).map_err(|e| StyleError::Io(path.clone(), e))?;
        self.content.store(Some(Arc::new(css)));
        Ok(())
    }
}
