//! The gallery engine
//!
//! - Language filtering of the loaded dataset (filter.rs)
//! - Page state, slicing and navigation affordances (pager.rs)

pub mod filter;
pub mod pager;

pub use filter::{normalize_language, ActiveSet, DatasetFilter, ALL_LANGUAGES};
pub use pager::{Pager, PaginationControls, DEFAULT_PAGE_SIZE};
