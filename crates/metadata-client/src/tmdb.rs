//! TMDB v3 API provider.
//!
//! Endpoints used:
//! - `search/movie?query=<title>` for poster lookup
//! - `trending/movie/week` and `movie/top_rated` for listings
//!
//! Authentication is the `api_key` query parameter. The default reqwest
//! client is used as is: no timeout override and no retry.

use crate::error::{MetadataError, Result};
use crate::{Listing, MetadataProvider, MovieSummary};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::{debug, instrument};

pub const DEFAULT_TMDB_API_URL: &str = "https://api.themoviedb.org/3";

#[derive(Deserialize)]
struct PagedResponse {
    #[serde(default)]
    results: Vec<MovieSummary>,
}

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key: api_key.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<MovieSummary>> {
        let url = format!("{}/{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MetadataError::Status {
                status: response.status().as_u16(),
                endpoint: path.to_string(),
            });
        }

        let body: PagedResponse = response
            .json()
            .await
            .map_err(|e| MetadataError::InvalidResponse(e.to_string()))?;

        debug!(endpoint = path, results = body.results.len(), "TMDB response");
        Ok(body.results)
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    #[instrument(skip(self))]
    async fn search(&self, title: &str) -> Result<Vec<MovieSummary>> {
        self.get("search/movie", &[("query", title)]).await
    }

    #[instrument(skip(self))]
    async fn listing(&self, listing: Listing) -> Result<Vec<MovieSummary>> {
        self.get(listing.path(), &[]).await
    }
}
