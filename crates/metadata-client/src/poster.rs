//! Poster URL resolution with a shared in-memory cache.
//!
//! ## Algorithm
//! 1. Cache hit: return the cached URL
//! 2. Miss: search the provider for the title
//! 3. First result with a poster path: `image_base_url + poster_path`, cached
//! 4. Anything else (error, no result, no poster): the placeholder, not cached
//!
//! The cache grows without bound for the life of the process. Two concurrent
//! misses for the same title may both query the provider; both write the
//! same value.

use crate::{Listing, MetadataProvider};
use futures_util::future::join_all;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://via.placeholder.com/150";

/// Title -> poster URL, shared by every request handler
pub type PosterCache = Arc<RwLock<HashMap<String, String>>>;

/// A listed movie with its poster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PosterCard {
    pub title: String,
    pub poster_url: String,
}

#[derive(Clone)]
pub struct PosterResolver {
    provider: Arc<dyn MetadataProvider>,
    cache: PosterCache,
    image_base_url: String,
    placeholder_url: String,
}

impl PosterResolver {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            provider,
            cache: PosterCache::default(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
        }
    }

    pub fn with_image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = url.into();
        self
    }

    pub fn with_placeholder_url(mut self, url: impl Into<String>) -> Self {
        self.placeholder_url = url.into();
        self
    }

    /// Share an existing cache instead of starting empty
    pub fn with_cache(mut self, cache: PosterCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &PosterCache {
        &self.cache
    }

    pub fn placeholder_url(&self) -> &str {
        &self.placeholder_url
    }

    fn image_url(&self, poster_path: &str) -> String {
        format!("{}{}", self.image_base_url, poster_path)
    }

    /// Poster URL for a title; never fails
    #[instrument(skip(self))]
    pub async fn resolve(&self, title: &str) -> String {
        if let Some(url) = self.cache.read().await.get(title) {
            debug!("Poster cache hit for '{}'", title);
            return url.clone();
        }

        let results = match self.provider.search(title).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "Poster lookup failed for '{}'", title);
                return self.placeholder_url.clone();
            }
        };

        let Some(poster_path) = results.first().and_then(|m| m.poster_path.as_deref()) else {
            debug!("No poster found for '{}'", title);
            return self.placeholder_url.clone();
        };

        let url = self.image_url(poster_path);
        self.cache
            .write()
            .await
            .insert(title.to_string(), url.clone());
        url
    }

    /// Resolve several titles concurrently, preserving order
    pub async fn resolve_many<S: AsRef<str>>(&self, titles: &[S]) -> Vec<String> {
        join_all(titles.iter().map(|t| self.resolve(t.as_ref()))).await
    }

    /// Cards of a curated listing; movies without a poster are skipped and
    /// a failed request yields an empty list
    #[instrument(skip(self))]
    pub async fn listing(&self, listing: Listing) -> Vec<PosterCard> {
        match self.provider.listing(listing).await {
            Ok(movies) => movies
                .into_iter()
                .filter_map(|movie| {
                    let poster_url = self.image_url(movie.poster_path.as_deref()?);
                    Some(PosterCard {
                        title: movie.title,
                        poster_url,
                    })
                })
                .collect(),
            Err(e) => {
                warn!(error = %e, "Listing {:?} failed", listing);
                Vec::new()
            }
        }
    }
}
