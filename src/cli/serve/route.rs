//! Request URL routing.

use crate::utils::path::decode_url_path;

/// Prefix of the freshness poll endpoint.
pub const CHECK_PREFIX: &str = "/api/check_modified/";

/// Where a request URL leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Poll for a note's dirty flag, by path relative to the notes root.
    CheckModified(String),
    /// A directory listing or a note, by path relative to the notes root.
    Page(String),
    /// Undecodable, or escapes the notes root.
    Invalid,
}

impl Route {
    pub fn parse(url: &str) -> Self {
        if let Some(rest) = url.strip_prefix(CHECK_PREFIX) {
            return match decode_url_path(rest) {
                Some(rel) if !rel.is_empty() => Self::CheckModified(rel),
                _ => Self::Invalid,
            };
        }

        decode_url_path(url).map_or(Self::Invalid, Self::Page)
    }
}
