//! Offline catalog build and serve-time filtering.
//!
//! This crate provides:
//! - Text normalisation and tag construction for every movie
//! - A TF-IDF vectorizer and the pairwise cosine similarity matrix
//! - `CatalogBuilder`, which runs the whole offline build
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//! - Category tables mapping moods and age groups to genres
//!
//! ## Architecture
//! The offline build runs in stages:
//! 1. FeatureBuilder turns each raw movie into a normalised tag string
//! 2. TfidfVectorizer fits a vocabulary and weighs every tag string
//! 3. cosine_matrix scores every pair of movies
//! 4. The results are assembled into an index-aligned `Catalog`
//!
//! At serve time, candidates from the `sources` crate pass through a
//! FilterPipeline before they are paginated.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{CatalogBuilder, CategoryKind, CategoryTable, FilterPipeline};
//! use pipeline::filters::*;
//!
//! // Offline
//! let catalog = CatalogBuilder::new()
//!     .with_max_features(5000)
//!     .build_from_csv(movies_csv, credits_csv)?;
//! catalog.save_to_dir(Path::new("artifacts"))?;
//!
//! // Serving
//! let genres = CategoryTable::default().genres_for(CategoryKind::AgeGroup, "kids");
//! let pipeline = FilterPipeline::new().add_filter(GenreFilter::new(genres));
//! let filtered = pipeline.apply(candidates, &catalog)?;
//! ```

pub mod error;
pub mod text;
pub mod stopwords;
pub mod features;
pub mod vectorizer;
pub mod similarity;
pub mod catalog_builder;
pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod category;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use error::{PipelineError, Result};
pub use text::{TextNormalizer, strip_spaces};
pub use features::FeatureBuilder;
pub use vectorizer::{SparseVector, TfidfVectorizer};
pub use similarity::cosine_matrix;
pub use catalog_builder::CatalogBuilder;
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
pub use category::{CategoryKind, CategoryTable};
