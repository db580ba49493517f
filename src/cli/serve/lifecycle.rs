//! Server lifecycle management.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use crossbeam::channel::Receiver;
use tiny_http::Server;

use crate::config::ServeConfig;
use crate::core::SharedState;
use crate::log;
use crate::logger::error_chain;
use crate::watch::{self, WatchHandle};

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_err = None;

    for offset in 0..MAX_PORT_RETRIES {
        let Some(port) = base_port.checked_add(offset) else {
            break;
        };
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_err = Some(e),
        }
    }

    Err(anyhow!(
        "failed to bind {} after {} attempts from port {}: {}",
        interface,
        MAX_PORT_RETRIES,
        base_port,
        last_err.map_or_else(|| "no ports left".to_string(), |e| e.to_string())
    ))
}

/// Start the watcher unless disabled.
///
/// A watcher that fails to start is not fatal: cached entries are still
/// checked against source mtimes, only the browser refresh signal is lost.
pub fn spawn_watcher(
    config: &Arc<ServeConfig>,
    state: &Arc<SharedState>,
    shutdown_rx: Receiver<()>,
) -> Option<WatchHandle> {
    if !config.watch {
        log!("watch"; "disabled, relying on mtime checks only");
        return None;
    }

    match watch::spawn(Arc::clone(config), Arc::clone(state), shutdown_rx) {
        Ok(handle) => Some(handle),
        Err(err) => {
            log!("error"; "{}, relying on mtime checks only", error_chain(&err));
            None
        }
    }
}

/// Wait for the watcher to stop.
pub fn wait_for_shutdown(handle: Option<WatchHandle>) {
    if let Some(handle) = handle {
        handle.join();
    }
}
