//! URL processing utilities.
//!
//! Converts between request URLs and paths relative to the notes root.

use std::path::Path;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters escaped when a relative path is placed in a URL path.
const PATH_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped in a query component.
const QUERY_SET: &AsciiSet = &PATH_SET.add(b'&').add(b'+').add(b'=').add(b'/');

/// Decode a request URL into a relative path fragment.
///
/// Strips the query string, percent-decodes, and trims slashes.
/// Returns `None` for paths containing `..` segments.
///
/// # Examples
/// ```ignore
/// assert_eq!(decode_url_path("/notes/a%20b.md?x=1"), Some("notes/a b.md".into()));
/// assert_eq!(decode_url_path("/../etc/passwd"), None);
/// ```
pub fn decode_url_path(url: &str) -> Option<String> {
    let path = url.split('?').next().unwrap_or(url);
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    let clean = decoded.trim_matches('/');

    if clean.split(['/', '\\']).any(|segment| segment == "..") {
        return None;
    }

    Some(clean.to_string())
}

/// Path of `path` relative to `root`, using `/` separators.
///
/// Returns `None` if `path` is not under `root`.
pub fn relative_url(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

/// Percent-encode a `/`-separated relative path for use in a URL.
pub fn encode_url_path(rel: &str) -> String {
    utf8_percent_encode(rel, PATH_SET).to_string()
}

/// Percent-encode a single query value.
pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_SET).to_string()
}

/// Split the query string of a request URL into decoded `(key, value)` pairs.
pub fn query_pairs(url: &str) -> Vec<(String, String)> {
    let Some((_, query)) = url.split_once('?') else {
        return Vec::new();
    };

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    percent_decode_str(&raw).decode_utf8_lossy().into_owned()
}
