//! Offline build: raw movies -> tags -> TF-IDF -> cosine matrix -> Catalog.

use crate::error::{PipelineError, Result};
use crate::features::FeatureBuilder;
use crate::similarity::cosine_matrix;
use crate::vectorizer::TfidfVectorizer;
use data_loader::{Catalog, RawMovie, parser::load_raw_movies};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument};

/// Runs every offline stage and assembles an index-aligned `Catalog`
pub struct CatalogBuilder {
    features: FeatureBuilder,
    vectorizer: TfidfVectorizer,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self {
            features: FeatureBuilder::new(),
            vectorizer: TfidfVectorizer::new(),
        }
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.vectorizer = self.vectorizer.with_max_features(max_features);
        self
    }

    pub fn with_cast_limit(mut self, cast_limit: usize) -> Self {
        self.features = self.features.with_cast_limit(cast_limit);
        self
    }

    /// Parse both TMDB exports and build the catalog
    pub fn build_from_csv(&self, movies_path: &Path, credits_path: &Path) -> Result<Catalog> {
        let raw = load_raw_movies(movies_path, credits_path)?;
        self.build(&raw)
    }

    #[instrument(skip(self, movies), fields(movies = movies.len()))]
    pub fn build(&self, movies: &[RawMovie]) -> Result<Catalog> {
        if movies.is_empty() {
            return Err(PipelineError::EmptyCorpus);
        }
        let start = Instant::now();

        let records = self.features.build_all(movies);
        let tags: Vec<&str> = records.iter().map(|r| r.tags.as_str()).collect();
        let (model, vectors) = self.vectorizer.fit_transform(&tags)?;
        let similarity = cosine_matrix(&vectors)?;

        let genres: Vec<String> = records
            .iter()
            .flat_map(|r| r.genres.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let catalog = Catalog::new(records, similarity, model, genres)?;
        info!(
            "Built catalog of {} movies in {:.2}s",
            catalog.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(catalog)
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
