use super::*;
use std::fs::File;
use std::sync::Barrier;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tempfile::TempDir;

use crate::config::{ConvertSettings, Settings, SettingsHandle, test_config};

fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

fn set_mtime(path: &Path, time: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

/// Wraps the source text in a minimal document, counting invocations.
#[derive(Clone, Default)]
struct Echo {
    calls: Arc<AtomicUsize>,
    delay: Duration,
}

impl Converter for Echo {
    fn convert(
        &self,
        source: &Path,
        output: &Path,
        _settings: &ConvertSettings,
    ) -> Result<(), ConvertError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(self.delay);
        let text = fs::read_to_string(source).unwrap_or_default();
        fs::write(
            output,
            format!("<html><head></head><body>{text}</body></html>"),
        )
        .map_err(|_| ConvertError::MissingOutput(output.to_path_buf()))
    }
}

/// Writes partial output, then fails.
struct Failing;

impl Converter for Failing {
    fn convert(
        &self,
        _source: &Path,
        output: &Path,
        _settings: &ConvertSettings,
    ) -> Result<(), ConvertError> {
        fs::write(output, "<html>").ok();
        Err(ConvertError::MissingOutput(output.to_path_buf()))
    }
}

/// Simulates an editor saving the note while it converts.
struct SavedDuringConversion;

impl Converter for SavedDuringConversion {
    fn convert(
        &self,
        source: &Path,
        output: &Path,
        _settings: &ConvertSettings,
    ) -> Result<(), ConvertError> {
        set_mtime(source, at(200));
        fs::write(output, "<p>old</p>").map_err(|_| ConvertError::MissingOutput(output.into()))
    }
}

/// Records the flags it was called with.
#[derive(Default)]
struct FlagRecorder {
    flags: Arc<Mutex<Vec<String>>>,
}

impl Converter for FlagRecorder {
    fn convert(
        &self,
        _source: &Path,
        output: &Path,
        settings: &ConvertSettings,
    ) -> Result<(), ConvertError> {
        *self.flags.lock() = settings.flags.clone();
        fs::write(output, "").map_err(|_| ConvertError::MissingOutput(output.into()))
    }
}

/// Simulates a settings or style reload landing while the note converts.
struct ClearedDuringConversion {
    state: Arc<SharedState>,
}

impl Converter for ClearedDuringConversion {
    fn convert(
        &self,
        _source: &Path,
        output: &Path,
        settings: &ConvertSettings,
    ) -> Result<(), ConvertError> {
        self.state.cache.clear_all();
        fs::write(output, format!("flags={:?}", settings.flags))
            .map_err(|_| ConvertError::MissingOutput(output.into()))
    }
}

struct Fixture {
    _dir: TempDir,
    config: ServeConfig,
    state: Arc<SharedState>,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let notes = dir.path().join("notes");
        fs::create_dir(&notes).unwrap();

        let mut config = test_config(&notes);
        config.artifact_dir = dir.path().join("artifacts");

        let state = SharedState::new(
            StyleSheet::from_content("body { margin: 0 }"),
            SettingsHandle::fixed(Settings::default()),
        );
        Self {
            _dir: dir,
            config,
            state,
        }
    }

    fn note(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.config.notes_dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        set_mtime(&path, at(100));
        path
    }

    fn coordinator(&self, converter: impl Converter + 'static) -> RenderCoordinator {
        RenderCoordinator::new(&self.config, Arc::clone(&self.state), Box::new(converter))
    }

    fn artifact_count(&self) -> usize {
        fs::read_dir(&self.config.artifact_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

#[test]
fn test_miss_then_hit() {
    let fx = Fixture::new();
    let source = fx.note("a.md", "hello");
    let echo = Echo::default();
    let render = fx.coordinator(echo.clone());

    let first = render.render(&source).unwrap();
    let second = render.render(&source).unwrap();

    assert_eq!(first, second);
    assert_eq!(echo.calls.load(Ordering::SeqCst), 1);
    assert!(first.starts_with(&fx.config.artifact_dir));
}

#[test]
fn test_artifact_embeds_style_and_poll_script() {
    let fx = Fixture::new();
    let source = fx.note("a.md", "hello");
    let render = fx.coordinator(Echo::default());

    let html = fs::read_to_string(render.render(&source).unwrap()).unwrap();

    assert!(html.contains("<style>\nbody { margin: 0 }\n</style>\n</head>"));
    assert!(html.contains("\"/api/check_modified/a.md\""));
    assert!(html.contains("var interval = 500;"));
    assert!(html.ends_with("</script>\n</body></html>"));
}

#[test]
fn test_poll_path_is_relative_and_encoded() {
    let fx = Fixture::new();
    let source = fx.note("sub dir/my note.md", "x");
    let render = fx.coordinator(Echo::default());

    let html = fs::read_to_string(render.render(&source).unwrap()).unwrap();
    assert!(html.contains("\"/api/check_modified/sub%20dir/my%20note.md\""));
}

#[test]
fn test_render_clears_dirty() {
    let fx = Fixture::new();
    let source = fx.note("a.md", "x");
    let id = SourceId::new(&source);
    fx.state.dirty.mark_dirty(&id);

    fx.coordinator(Echo::default()).render(&source).unwrap();

    assert!(!fx.state.dirty.is_dirty(&id));
}

#[test]
fn test_rerender_after_touch() {
    let fx = Fixture::new();
    let source = fx.note("a.md", "x");
    let id = SourceId::new(&source);
    let echo = Echo::default();
    let render = fx.coordinator(echo.clone());

    let first = render.render(&source).unwrap();
    assert_eq!(fx.state.cache.lookup(&id).unwrap().source_mtime, at(100));

    set_mtime(&source, at(150));
    assert!(fx.state.cache.lookup(&id).is_none());

    let second = render.render(&source).unwrap();
    assert_ne!(first, second);
    assert_eq!(echo.calls.load(Ordering::SeqCst), 2);
    assert_eq!(fx.state.cache.lookup(&id).unwrap().source_mtime, at(150));
    // Superseded artifacts are left in place for readers that still hold them
    assert!(first.is_file());
}

#[test]
fn test_missing_artifact_rerenders() {
    let fx = Fixture::new();
    let source = fx.note("a.md", "x");
    let echo = Echo::default();
    let render = fx.coordinator(echo.clone());

    let first = render.render(&source).unwrap();
    fs::remove_file(&first).unwrap();

    let second = render.render(&source).unwrap();
    assert!(second.is_file());
    assert_eq!(echo.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_failure_leaves_state_unchanged() {
    let fx = Fixture::new();
    let source = fx.note("c.md", "x");
    let id = SourceId::new(&source);
    fx.state.dirty.mark_dirty(&id);

    let result = fx.coordinator(Failing).render(&source);

    assert!(matches!(result, Err(RenderError::Conversion(..))));
    assert!(!fx.state.cache.contains(&id));
    assert!(fx.state.dirty.is_dirty(&id));
    assert_eq!(fx.artifact_count(), 0);
}

#[test]
fn test_failure_without_prior_dirty() {
    let fx = Fixture::new();
    let source = fx.note("c.md", "x");
    let id = SourceId::new(&source);

    assert!(fx.coordinator(Failing).render(&source).is_err());
    assert!(!fx.state.dirty.is_dirty(&id));
    assert!(fx.state.cache.is_empty());
}

#[test]
fn test_concurrent_misses_convert_once() {
    let fx = Fixture::new();
    let source = fx.note("e.md", "x");
    let id = SourceId::new(&source);
    fx.state.dirty.mark_dirty(&id);

    let echo = Echo {
        delay: Duration::from_millis(100),
        ..Echo::default()
    };
    let render = fx.coordinator(echo.clone());
    let barrier = Barrier::new(2);

    let (render, barrier, source) = (&render, &barrier, &source);
    let results: Vec<PathBuf> = thread::scope(|s| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                s.spawn(move || {
                    barrier.wait();
                    render.render(source).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results[0], results[1]);
    assert_eq!(echo.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fx.state.cache.len(), 1);
    assert_eq!(fx.state.cache.lookup(&id).unwrap().artifact, results[0]);
    assert!(!fx.state.dirty.is_dirty(&id));
    assert!(render.inflight.is_empty());
}

#[test]
fn test_different_notes_render_independently() {
    let fx = Fixture::new();
    let a = fx.note("a.md", "a");
    let b = fx.note("b.md", "b");
    let echo = Echo::default();
    let render = fx.coordinator(echo.clone());

    thread::scope(|s| {
        s.spawn(|| render.render(&a).unwrap());
        s.spawn(|| render.render(&b).unwrap());
    });

    assert_eq!(echo.calls.load(Ordering::SeqCst), 2);
    assert_eq!(fx.state.cache.len(), 2);
}

#[test]
fn test_save_during_conversion_stays_dirty() {
    let fx = Fixture::new();
    let source = fx.note("a.md", "x");
    let id = SourceId::new(&source);
    fx.state.dirty.mark_dirty(&id);

    fx.coordinator(SavedDuringConversion).render(&source).unwrap();

    assert!(fx.state.dirty.is_dirty(&id));
    assert_eq!(fx.state.cache.len(), 1);
    // Entry records the pre-conversion mtime, so the next request re-renders
    assert!(fx.state.cache.lookup(&id).is_none());
}

#[test]
fn test_missing_source() {
    let fx = Fixture::new();
    let source = fx.config.notes_dir.join("gone.md");

    let result = fx.coordinator(Echo::default()).render(&source);
    assert!(matches!(result, Err(RenderError::SourceMissing(_))));
}

#[test]
fn test_uses_current_settings() {
    let fx = Fixture::new();
    let source = fx.note("a.md", "x");
    let recorder = FlagRecorder::default();
    let flags = Arc::clone(&recorder.flags);

    fx.coordinator(recorder).render(&source).unwrap();
    assert_eq!(*flags.lock(), ["--standalone"]);
}

#[test]
fn test_no_style_configured() {
    let mut fx = Fixture::new();
    fx.state = SharedState::new(
        StyleSheet::load(None).unwrap(),
        SettingsHandle::fixed(Settings::default()),
    );
    let source = fx.note("a.md", "x");

    let artifact = fx.coordinator(Echo::default()).render(&source).unwrap();
    let html = fs::read_to_string(artifact).unwrap();
    assert!(!html.contains("<style>"));
    assert!(html.contains("check_modified"));
}

#[test]
fn test_clear_during_conversion_is_not_undone() {
    let fx = Fixture::new();
    let source = fx.note("a.md", "x");
    let id = SourceId::new(&source);
    fx.state.dirty.mark_dirty(&id);
    let render = fx.coordinator(ClearedDuringConversion {
        state: Arc::clone(&fx.state),
    });

    let artifact = render.render(&source).unwrap();

    assert!(artifact.is_file());
    assert!(!fx.state.cache.contains(&id));
    assert!(fx.state.cache.lookup(&id).is_none());
    assert!(!fx.state.dirty.is_dirty(&id));
}
