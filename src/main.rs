//! noteserve - serve a tree of notes as rendered HTML with live refresh.

mod cache;
mod cli;
mod config;
mod core;
mod embed;
mod freshness;
mod logger;
mod notes;
mod render;
mod utils;
mod watch;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::Cli;
use cli::serve::{ServeContext, bind_server, spawn_watcher, wait_for_shutdown};
use config::{ConfigError, ServeConfig, SettingsHandle};
use core::SharedState;
use render::{PandocConverter, RenderCoordinator, StyleSheet};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Arc::new(ServeConfig::from_cli(&cli)?);
    let state = init_state(&config)?;
    serve(config, state)
}

/// Load the stylesheet and settings, and check the converter exists.
fn init_state(config: &ServeConfig) -> Result<Arc<SharedState>> {
    let style = StyleSheet::load(config.css_file.clone()).context("failed to load stylesheet")?;
    let settings = SettingsHandle::load(config.settings_file.clone(), config.converter_flags.clone())?;

    let current = settings.get();
    let program = &current.convert.program;
    let resolved =
        which::which(program).map_err(|_| ConfigError::ConverterMissing(program.clone()))?;

    if let Some(path) = style.path() {
        log!("config"; "stylesheet: {}", path.display());
    }
    if let Some(path) = settings.path() {
        log!("config"; "settings: {}", path.display());
    }
    debug!("config"; "converter: {} {}", resolved.display(), current.convert.flags.join(" "));

    Ok(SharedState::new(style, settings))
}

fn serve(config: Arc<ServeConfig>, state: Arc<SharedState>) -> Result<()> {
    let renderer = RenderCoordinator::new(&config, Arc::clone(&state), Box::new(PandocConverter));

    let bound_server = bind_server(&config)?;
    let watcher = spawn_watcher(&config, &state, bound_server.shutdown_signal());

    let ctx = Arc::new(ServeContext {
        config: Arc::clone(&config),
        state,
        renderer,
    });
    let result = bound_server.run(Arc::clone(&ctx));

    wait_for_shutdown(watcher);
    if let Err(e) = ctx.renderer.artifacts().remove() {
        log!("error"; "failed to remove {}: {}", config.artifact_dir.display(), e);
    }
    result
}
