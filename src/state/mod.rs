//! State management module
//!
//! This module handles the persistent side of the gallery:
//! - Shared data structures (data.rs)
//! - The SQLite talk catalog and user preferences (library.rs)

pub mod data;
pub mod library;

pub use data::{LanguageSummary, LocalizedText, Record, TitleChoice};
pub use library::{CatalogSource, Library, PopulateOutcome};
