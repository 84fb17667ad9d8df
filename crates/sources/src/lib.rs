//! # Sources Crate
//!
//! This crate turns the precomputed catalog into candidate lists.
//!
//! ## Components
//!
//! ### Similarity Source
//! Nearest neighbours of a title in the cosine similarity matrix:
//! - "Movies similar to what you searched for"
//! - Exact, case-sensitive title match; stable ordering on ties
//!
//! ### Title Matcher
//! Fuzzy fallback when the query is not an exact title:
//! - Weighted edit-distance ratio over all catalog titles
//! - Returns the closest few titles as "did you mean" suggestions
//!
//! ### Catalog and History Sources
//! - Catalog: every movie in row order, for the browse filters
//! - History: neighbours of titles a user searched for earlier
//!
//! ### Evaluator
//! Offline precision estimate based on shared tag tokens.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{SimilaritySource, TitleMatcher};
//! use data_loader::Catalog;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::load_from_dir(Path::new("artifacts"))?);
//!
//! let similar = SimilaritySource::new(catalog.clone());
//! let recs = similar.recommend("Inception", 30);
//! if recs.is_empty() {
//!     let matcher = TitleMatcher::new(catalog.clone());
//!     let suggestions = matcher.suggest_close("Inceptoin", 5);
//! }
//! ```

// Public modules
pub mod types;
pub mod similar;
pub mod fuzzy;
pub mod catalog;
pub mod history;
pub mod evaluate;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use types::{Candidate, CandidateSource, TitleSuggestion};
pub use similar::SimilaritySource;
pub use fuzzy::TitleMatcher;
pub use catalog::CatalogSource;
pub use history::HistorySource;
pub use evaluate::{EvaluationReport, TagOverlapEvaluator};
