//! Note lookup and directory listing.
//!
//! - `resolve` - URL fragment → note file
//! - `title` - display titles from note content
//! - `listing` - sorted, filtered directory pages

mod listing;
mod resolve;
mod title;

pub use listing::{Listing, ListingQuery};
pub use resolve::find_note;
pub use title::extract_title;
