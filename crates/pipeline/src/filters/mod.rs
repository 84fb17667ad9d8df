//! Filter implementations for the candidate pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod genre;
pub mod title_prefix;

// Re-export for convenience
pub use genre::GenreFilter;
pub use title_prefix::TitlePrefixFilter;
