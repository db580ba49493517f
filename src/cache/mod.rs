//! In-memory freshness state for rendered notes.
//!
//! - `artifact` - source identity → rendered artifact, validated by mtime
//! - `dirty` - identities changed since their last render, read by pollers

mod artifact;
mod dirty;

pub use artifact::{ArtifactCache, CacheEntry};
pub use dirty::DirtySet;
