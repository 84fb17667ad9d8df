//! Client for the external movie metadata service (TMDB).
//!
//! This crate provides:
//! - The `MetadataProvider` trait: title search and curated listings
//! - `TmdbClient`, the reqwest-backed implementation
//! - `PosterResolver`, which turns titles into poster URLs through an
//!   unbounded, process-lifetime `PosterCache`
//!
//! Metadata failures never reach callers of `PosterResolver`: they are
//! logged and replaced by a placeholder image.

pub mod error;
pub mod poster;
pub mod tmdb;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use error::{MetadataError, Result};
pub use poster::{
    PosterCache, PosterCard, PosterResolver, DEFAULT_IMAGE_BASE_URL, DEFAULT_PLACEHOLDER_URL,
};
pub use tmdb::{TmdbClient, DEFAULT_TMDB_API_URL};

/// One movie in a metadata search or listing response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub title: String,
    /// Path relative to the image base URL, e.g. `/abc.jpg`
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Curated listings offered by the metadata service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listing {
    /// Trending this week
    Trending,
    TopRated,
}

impl Listing {
    /// Endpoint path relative to the API root
    pub fn path(&self) -> &'static str {
        match self {
            Listing::Trending => "trending/movie/week",
            Listing::TopRated => "movie/top_rated",
        }
    }
}

/// Source of movie metadata.
///
/// Implemented by `TmdbClient`; tests substitute mocks or stubs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Movies matching a title, best match first
    async fn search(&self, title: &str) -> Result<Vec<MovieSummary>>;

    /// Movies of a curated listing
    async fn listing(&self, listing: Listing) -> Result<Vec<MovieSummary>>;
}
