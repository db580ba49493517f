//! Freshness checks.
//!
//! - `mtime` - source timestamp comparison backing cache validity
//! - `check` - the dirty-flag query behind `/api/check_modified`

mod check;
mod mtime;

pub use check::is_modified;
pub use mtime::{get_mtime, is_source_unchanged};
