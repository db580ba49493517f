//! File watcher
//!
//! Watches the notes tree, the stylesheet, and the settings file, and keeps
//! the artifact cache and dirty set in step with what changed on disk.
//!
//! Architecture:
//! ```text
//! notify callback → channel → Debouncer (pure timing) → Classifier → apply
//! ```
//!
//! The notify callback only forwards events; a single consumer thread owns
//! every mutation, so events are applied in order.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver};
use notify::RecommendedWatcher;

use crate::config::ServeConfig;
use crate::core::SharedState;

// Applying classified events to shared state.
mod apply;
// Business classification (raw changes -> actionable events).
mod classifier;
// Pure timing and deduplication.
mod debouncer;
// Watch root attach/re-attach lifecycle.
mod roots;
// Shared watch types and errors.
mod types;


pub use types::WatchError;

use apply::apply_events;
use classifier::EventClassifier;
use debouncer::Debouncer;
use roots::{WatchRoots, roots_for};

type NotifyResult = notify::Result<notify::Event>;

/// Running watcher thread.
pub struct WatchHandle {
    thread: JoinHandle<()>,
}

impl WatchHandle {
    /// Wait for the watcher thread to finish after shutdown was signalled.
    pub fn join(self) {
        if self.thread.join().is_err() {
            crate::log!("error"; "watcher thread panicked");
        }
    }
}

/// Start watching.
///
/// The watcher is attached before this returns, so no change made after the
/// call is missed. The thread exits when `shutdown` receives or disconnects.
pub fn spawn(
    config: Arc<ServeConfig>,
    state: Arc<SharedState>,
    shutdown: Receiver<()>,
) -> Result<WatchHandle, WatchError> {
    let (events_tx, events_rx) = channel::unbounded::<NotifyResult>();

    let mut watcher = notify::recommended_watcher(move |res: NotifyResult| {
        let _ = events_tx.send(res);
    })?;

    let mut roots = WatchRoots::new(roots_for(&config));
    roots.attach_existing(&mut watcher)?;

    let thread = thread::Builder::new()
        .name("watch".into())
        .spawn(move || run(watcher, roots, events_rx, shutdown, &config, &state))
        .map_err(|e| WatchError::Notify(notify::Error::io(e)))?;

    Ok(WatchHandle { thread })
}

/// Consumer loop: collect events, apply them once the debounce window closes.
fn run(
    mut watcher: RecommendedWatcher,
    mut roots: WatchRoots,
    events: Receiver<NotifyResult>,
    shutdown: Receiver<()>,
    config: &ServeConfig,
    state: &SharedState,
) {
    let mut debouncer = Debouncer::new();

    loop {
        channel::select! {
            recv(events) -> msg => match msg {
                Ok(Ok(event)) => debouncer.add_event(&event),
                Ok(Err(err)) => report(WatchError::from(err)),
                Err(_) => break,
            },
            recv(shutdown) -> _ => break,
            default(debouncer.sleep_duration()) => {}
        }

        roots.maintain(&mut watcher);

        if let Some(raw) = debouncer.take_if_ready() {
            let events = EventClassifier::classify(raw, config, &state.cache);
            apply_events(&events, config, state);
        }
    }

    crate::debug!("watch"; "stopped");
}

fn report(err: WatchError) {
    if err.is_retryable() {
        crate::debug!("watch"; "{}", crate::logger::error_chain(&err));
    } else {
        crate::log!("error"; "{}", crate::logger::error_chain(&err));
    }
}
