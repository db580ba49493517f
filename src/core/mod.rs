//! Core types - pure abstractions shared across the codebase.

mod category;
mod shared;
mod source;
mod state;

pub use category::FileCategory;
pub use shared::SharedState;
pub use source::SourceId;
pub use state::{is_shutdown, register_server, setup_shutdown_handler};
