//! Path and URL utilities.
//!
//! Pure functions for path manipulation.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `expand_path`)
//! - [`route`]: URL utilities (`decode_url_path`, `encode_url_path`, `relative_url`)

pub mod fs;
pub mod route;

pub use fs::{expand_path, normalize_path};
pub use route::{
    decode_url_path, encode_query_value, encode_url_path, query_pairs, relative_url,
};
