//! Legacy GeoIP `.dat` format
//!
//! ## Architecture
//!
//! - **types**: editions, pointer widths and format constants
//! - **format**: trailer and info-string parsing
//! - **tree**: search tree traversal for IPv4 lookups
//!
//! Record decoding lives in `crate::record`, byte access in `crate::storage`.

pub mod format;
pub mod tree;
pub mod types;

pub use format::{database_info, DatHeader};
pub use tree::{LookupResult, SearchTree};
pub use types::{DatabaseKind, RecordLength};
