//! HTTP response handlers.

use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::utils::mime::{HTML, JSON, PLAIN};

/// Headers that keep browsers from reusing a rendered note.
const NO_CACHE: [(&str, &str); 3] = [
    ("Cache-Control", "no-cache, no-store, must-revalidate"),
    ("Pragma", "no-cache"),
    ("Expires", "0"),
];

/// Respond with a rendered artifact, never cached by the browser.
pub fn respond_artifact(request: Request, path: &Path) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 200, HTML, &NO_CACHE);
    }

    let body = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    send_body(request, 200, HTML, &NO_CACHE, body)
}

pub fn respond_html(request: Request, body: String) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 200, HTML, &NO_CACHE);
    }
    send_body(request, 200, HTML, &NO_CACHE, body.into_bytes())
}

/// Respond to a freshness poll with `{"modified": bool}`.
pub fn respond_modified(request: Request, modified: bool) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 200, JSON, &NO_CACHE);
    }
    let body = serde_json::to_vec(&serde_json::json!({ "modified": modified }))?;
    send_body(request, 200, JSON, &NO_CACHE, body)
}

pub fn respond_not_found(request: Request) -> Result<()> {
    send_status(request, 404, "404 Not Found")
}

/// Generic failure; the cause has already been logged.
pub fn respond_server_error(request: Request) -> Result<()> {
    send_status(request, 500, "500 Internal Server Error")
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_status(request, 503, "503 Service Unavailable")
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_status(request: Request, status: u16, text: &'static str) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, status, PLAIN, &[]);
    }
    send_body(request, status, PLAIN, &[], text.as_bytes().to_vec())
}

fn send_head(
    request: Request,
    status: u16,
    content_type: &str,
    extra: &[(&str, &str)],
) -> Result<()> {
    let mut response = Response::empty(StatusCode(status));
    for header in headers(content_type, extra)? {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &str,
    extra: &[(&str, &str)],
    body: Vec<u8>,
) -> Result<()> {
    let mut response = Response::from_data(body).with_status_code(StatusCode(status));
    for header in headers(content_type, extra)? {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

fn headers(content_type: &str, extra: &[(&str, &str)]) -> Result<Vec<Header>> {
    std::iter::once(("Content-Type", content_type))
        .chain(extra.iter().copied())
        .map(|(key, value)| make_header(key, value))
        .collect()
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow!("invalid header `{key}: {value}`"))
}
