//! Render coordination: source note → servable artifact.
//!
//! - `convert` - the external converter seam
//! - `inject` - style and poll script embedding
//! - `output` - unique artifact paths
//! - `style` - live stylesheet
//!
//! # Concurrency
//!
//! Concurrent renders of the same note are single-flighted: the second caller
//! waits on a per-identity lock, then finds the first caller's artifact in the
//! cache. Different notes convert in parallel. No cache lock is ever held
//! across a conversion.

mod convert;
mod inject;
mod output;
mod style;

#[cfg(test)]
mod tests;

pub use convert::{ConvertError, Converter, PandocConverter};
pub use inject::inject;
pub use output::ArtifactDir;
pub use style::{StyleError, StyleSheet};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use thiserror::Error;

use crate::config::ServeConfig;
use crate::core::{SharedState, SourceId};
use crate::embed::serve::{POLL_JS, PollVars};
use crate::freshness::get_mtime;
use crate::logger::error_chain;
use crate::utils::path::{encode_url_path, relative_url};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("source `{0}` does not exist")]
    SourceMissing(PathBuf),

    #[error("failed to convert `{0}`")]
    Conversion(PathBuf, #[source] ConvertError),

    #[error("failed to post-process artifact `{0}`")]
    Io(PathBuf, #[source] std::io::Error),
}

/// Produces fresh artifacts, consulting and maintaining the shared cache.
pub struct RenderCoordinator {
    state: Arc<SharedState>,
    converter: Box<dyn Converter>,
    output: ArtifactDir,
    notes_dir: PathBuf,
    refresh_interval: u64,
    inflight: DashMap<SourceId, Arc<Mutex<()>>>,
}

impl RenderCoordinator {
    pub fn new(
        config: &ServeConfig,
        state: Arc<SharedState>,
        converter: Box<dyn Converter>,
    ) -> Self {
        Self {
            state,
            converter,
            output: ArtifactDir::new(&config.artifact_dir),
            notes_dir: config.notes_dir.clone(),
            refresh_interval: config.refresh_interval,
            inflight: DashMap::new(),
        }
    }

    pub fn artifacts(&self) -> &ArtifactDir {
        &self.output
    }

    /// Return a fresh artifact for `source`, converting only on a cache miss.
    pub fn render(&self, source: &Path) -> Result<PathBuf, RenderError> {
        let id = SourceId::new(source);
        if let Some(entry) = self.state.cache.lookup(&id) {
            return Ok(entry.artifact);
        }

        let lock = self.flight_lock(&id);
        let result = {
            let _guard = lock.lock();
            // A concurrent render may have finished while we waited.
            match self.state.cache.lookup(&id) {
                Some(entry) => Ok(entry.artifact),
                None => self.render_fresh(&id),
            }
        };
        drop(lock);
        self.inflight
            .remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);

        if let Err(err) = &result {
            crate::log!("error"; "{}", error_chain(err));
        }
        result
    }

    fn flight_lock(&self, id: &SourceId) -> Arc<Mutex<()>> {
        Arc::clone(self.inflight.entry(id.clone()).or_default().value())
    }

    fn render_fresh(&self, id: &SourceId) -> Result<PathBuf, RenderError> {
        let source = id.path();
        // Recorded before converting: a save during conversion leaves the entry stale.
        let mtime = get_mtime(source).ok_or_else(|| RenderError::SourceMissing(source.into()))?;

        let artifact = self
            .output
            .next(id.stem())
            .map_err(|e| RenderError::Io(self.output.root().to_path_buf(), e))?;
        // Read before settings and style, so a reload during conversion is not undone by `store`.
        let generation = self.state.cache.generation();
        let settings = self.state.settings.get();

        crate::debug!("render"; "converting {}", id);
        if let Err(err) = self.converter.convert(source, &artifact, &settings.convert) {
            fs::remove_file(&artifact).ok();
            return Err(RenderError::Conversion(source.into(), err));
        }

        self.post_process(id, &artifact)?;
        if !self
            .state
            .cache
            .store_if_current(id.clone(), &artifact, mtime, generation)
        {
            crate::debug!("render"; "{} rendered against replaced settings, not cached", id);
        }

        if get_mtime(source) == Some(mtime) {
            self.state.dirty.clear_dirty(id);
        } else {
            crate::debug!("render"; "{} changed during conversion, staying dirty", id);
        }

        crate::log!("render"; "{}", self.display_name(id));
        Ok(artifact)
    }

    /// Embed the current stylesheet and the poll script.
    fn post_process(&self, id: &SourceId, artifact: &Path) -> Result<(), RenderError> {
        let io_err = |e| RenderError::Io(artifact.to_path_buf(), e);
        let content = fs::read_to_string(artifact).map_err(io_err)?;

        let check_url = format!("/api/check_modified/{}", self.poll_path(id));
        let script = POLL_JS.render(&PollVars {
            check_url: &check_url,
            interval: self.refresh_interval,
        });
        let style = self.state.style.get();

        let html = inject(&content, style.as_deref().map(String::as_str), &script);
        fs::write(artifact, html).map_err(io_err)
    }

    /// URL-encoded path of `id` relative to the notes directory.
    fn poll_path(&self, id: &SourceId) -> String {
        let rel = relative_url(id.path(), &self.notes_dir)
            .unwrap_or_else(|| id.stem().to_string());
        encode_url_path(&rel)
    }

    fn display_name(&self, id: &SourceId) -> String {
        id.path()
            .strip_prefix(&self.notes_dir)
            .unwrap_or(id.path())
            .display()
            .to_string()
    }
}
