//! Notes server with live refresh support.
//!
//! ```text
//! GET /api/check_modified/<rel>  → {"modified": bool}
//! GET /<dir>                     → directory listing
//! GET /<note>                    → resolve → render (cached) → artifact
//! ```

mod lifecycle;
mod response;
mod route;

pub use lifecycle::{spawn_watcher, wait_for_shutdown};

use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel;
use tiny_http::{Request, Server};

use crate::config::ServeConfig;
use crate::core::{SharedState, SourceId, is_shutdown, register_server};
use crate::freshness::is_modified;
use crate::notes::{Listing, ListingQuery, find_note};
use crate::render::RenderCoordinator;
use crate::{debug, log};
use route::Route;

/// Threads answering requests; a render blocks one for the whole conversion.
const REQUEST_THREADS: usize = 8;

/// Everything a request handler needs.
pub struct ServeContext {
    pub config: Arc<ServeConfig>,
    pub state: Arc<SharedState>,
    pub renderer: RenderCoordinator,
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    shutdown_rx: channel::Receiver<()>,
}

/// Bind the HTTP server and register it for Ctrl+C shutdown.
pub fn bind_server(config: &ServeConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.interface, config.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::bounded::<()>(1);
    register_server(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}", addr);
    debug!("serve"; "notes: {}", config.notes_dir.display());

    Ok(BoundServer {
        server,
        shutdown_rx,
    })
}

impl BoundServer {
    /// Receiver signalled when Ctrl+C is pressed.
    pub fn shutdown_signal(&self) -> channel::Receiver<()> {
        self.shutdown_rx.clone()
    }

    /// Run the request loop until the server is unblocked (blocking).
    pub fn run(self, ctx: Arc<ServeContext>) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(REQUEST_THREADS)
            .thread_name(|i| format!("request-{i}"))
            .build()
            .context("failed to create request thread pool")?;

        for request in self.server.incoming_requests() {
            let ctx = Arc::clone(&ctx);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &ctx) {
                    log!("serve"; "request error: {e:#}");
                }
            });
        }
        Ok(())
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, ctx: &ServeContext) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    debug!("serve"; "{} {}", request.method(), request.url());

    match Route::parse(request.url()) {
        Route::CheckModified(rel) => {
            let id = SourceId::new(ctx.config.notes_dir.join(rel));
            response::respond_modified(request, is_modified(&ctx.state, &id))
        }
        Route::Page(rel) => serve_page(request, &rel, ctx),
        Route::Invalid => response::respond_not_found(request),
    }
}

fn serve_page(request: Request, rel: &str, ctx: &ServeContext) -> Result<()> {
    let target = ctx.config.notes_dir.join(rel);

    if target.is_dir() {
        let query = ListingQuery::from_url(request.url());
        return match Listing::read(&ctx.config, &target, query) {
            Ok(listing) => {
                let style = ctx.state.style.get();
                let html = listing.render(style.as_deref().map(String::as_str));
                response::respond_html(request, html)
            }
            Err(e) => {
                log!("error"; "failed to list {}: {}", target.display(), e);
                response::respond_server_error(request)
            }
        };
    }

    let Some(source) = find_note(&ctx.config, rel) else {
        debug!("serve"; "not found: /{}", rel);
        return response::respond_not_found(request);
    };

    match ctx.renderer.render(&source) {
        Ok(artifact) => response::respond_artifact(request, &artifact),
        // Logged by the renderer with its cause.
        Err(_) => response::respond_server_error(request),
    }
}
