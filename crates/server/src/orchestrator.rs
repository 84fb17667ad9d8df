//! # Recommendation Orchestrator
//!
//! Coordinates every request-time flow over the shared catalog:
//! 1. Generate candidates (similarity, browse or history source)
//! 2. Apply filters for browse requests
//! 3. Paginate
//! 4. Resolve posters for the displayed page only
//!
//! CPU-bound ranking runs on the blocking pool; poster lookups run
//! concurrently on the async runtime.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, instrument};

use data_loader::Catalog;
use metadata_client::{Listing, PosterResolver};
use pipeline::filters::{GenreFilter, TitlePrefixFilter};
use pipeline::{CategoryKind, CategoryTable, FilterPipeline};
use sources::{Candidate, CatalogSource, HistorySource, SimilaritySource, TitleMatcher};

/// A movie ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieCard {
    pub title: String,
    pub poster_url: String,
}

/// A "did you mean" entry shown when a title is not found
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionCard {
    pub title: String,
    pub score: u8,
    pub poster_url: String,
}

/// One page of results, shared by search, browse and listing responses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationPage {
    pub movies: Vec<MovieCard>,
    /// 1-based page actually served
    pub page: usize,
    pub total_pages: usize,
    pub total_results: usize,
    pub not_found: bool,
    pub suggestions: Vec<SuggestionCard>,
}

impl RecommendationPage {
    fn single(movies: Vec<MovieCard>) -> Self {
        let total = movies.len();
        Self {
            movies,
            page: 1,
            total_pages: usize::from(total > 0),
            total_results: total,
            not_found: false,
            suggestions: Vec::new(),
        }
    }
}

/// Result sizes used by the orchestrator
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorSettings {
    pub page_size: usize,
    pub recommend_limit: usize,
    pub suggestion_limit: usize,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            page_size: 12,
            recommend_limit: 30,
            suggestion_limit: 5,
        }
    }
}

/// Main orchestrator that coordinates the recommendation flows
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    catalog: Arc<Catalog>,
    similar: SimilaritySource,
    matcher: TitleMatcher,
    browse: CatalogSource,
    history: HistorySource,
    categories: Arc<CategoryTable>,
    posters: PosterResolver,
    settings: OrchestratorSettings,
}

impl RecommendationOrchestrator {
    pub fn new(
        catalog: Arc<Catalog>,
        posters: PosterResolver,
        categories: CategoryTable,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            similar: SimilaritySource::new(catalog.clone()),
            matcher: TitleMatcher::new(catalog.clone()),
            browse: CatalogSource::new(catalog.clone()),
            history: HistorySource::new(catalog.clone()),
            catalog,
            categories: Arc::new(categories),
            posters,
            settings: OrchestratorSettings {
                page_size: settings.page_size.max(1),
                ..settings
            },
        }
    }

    /// Similar movies for a title, one page at a time.
    ///
    /// An unknown title yields an empty page flagged `not_found`, carrying
    /// close title suggestions instead.
    #[instrument(skip(self))]
    pub async fn recommend_page(&self, title: &str, page: usize) -> Result<RecommendationPage> {
        let start_time = Instant::now();

        let candidates = tokio::task::spawn_blocking({
            let similar = self.similar.clone();
            let title = title.to_string();
            let limit = self.settings.recommend_limit;
            move || similar.recommend(&title, limit)
        })
        .await
        .context("Similarity task panicked")?;

        if candidates.is_empty() {
            info!("'{}' not found, falling back to title suggestions", title);
            let suggestions = self.suggestions_for(title).await?;
            return Ok(RecommendationPage {
                movies: Vec::new(),
                page: 1,
                total_pages: 0,
                total_results: 0,
                not_found: true,
                suggestions,
            });
        }

        let result = self.page_of(candidates, page).await;
        info!(
            "Served page {}/{} for '{}' in {:.2?}",
            result.page,
            result.total_pages,
            title,
            start_time.elapsed()
        );
        Ok(result)
    }

    async fn suggestions_for(&self, title: &str) -> Result<Vec<SuggestionCard>> {
        let suggestions = tokio::task::spawn_blocking({
            let matcher = self.matcher.clone();
            let title = title.to_string();
            let limit = self.settings.suggestion_limit;
            move || matcher.suggest_close(&title, limit)
        })
        .await
        .context("Fuzzy match task panicked")?;

        let titles: Vec<&str> = suggestions.iter().map(|s| s.title.as_str()).collect();
        let posters = self.posters.resolve_many(&titles).await;

        Ok(suggestions
            .iter()
            .zip(posters)
            .map(|(s, poster_url)| SuggestionCard {
                title: s.title.clone(),
                score: s.score,
                poster_url,
            })
            .collect())
    }

    /// Movies in one genre, in catalog order
    #[instrument(skip(self))]
    pub async fn genre_page(&self, genre: &str, page: usize) -> Result<RecommendationPage> {
        self.browse_page(&[genre][..], page).await
    }

    /// Movies matching a mood or age-group label; unknown labels give an
    /// empty page
    #[instrument(skip(self))]
    pub async fn category_page(
        &self,
        kind: CategoryKind,
        label: &str,
        page: usize,
    ) -> Result<RecommendationPage> {
        let genres = self.categories.genres_for(kind, label);
        debug!("{:?} '{}' maps to genres {:?}", kind, label, genres);
        self.browse_page(genres, page).await
    }

    async fn browse_page<S: AsRef<str>>(
        &self,
        genres: &[S],
        page: usize,
    ) -> Result<RecommendationPage> {
        let filters = FilterPipeline::new().add_filter(GenreFilter::new(genres));
        let candidates = filters
            .apply(self.browse.all_candidates(), &self.catalog)
            .context("Failed to filter catalog by genre")?;
        Ok(self.page_of(candidates, page).await)
    }

    /// Titles starting with `letter`, case-insensitive, in catalog order
    pub fn titles_by_letter(&self, letter: &str) -> Result<Vec<String>> {
        let filters = FilterPipeline::new().add_filter(TitlePrefixFilter::new(letter));
        let candidates = filters
            .apply(self.browse.all_candidates(), &self.catalog)
            .context("Failed to filter catalog by title prefix")?;
        Ok(candidates.into_iter().map(|c| c.title).collect())
    }

    /// Trending or top-rated movies from the metadata service
    pub async fn listing(&self, listing: Listing) -> RecommendationPage {
        let movies = self
            .posters
            .listing(listing)
            .await
            .into_iter()
            .map(|card| MovieCard {
                title: card.title,
                poster_url: card.poster_url,
            })
            .collect();
        RecommendationPage::single(movies)
    }

    /// "Because you searched for" cards built from past search terms
    #[instrument(skip(self, terms), fields(terms = terms.len()))]
    pub async fn history_suggestions(&self, terms: &[String]) -> Result<Vec<MovieCard>> {
        let candidates = tokio::task::spawn_blocking({
            let history = self.history.clone();
            let terms = terms.to_vec();
            move || history.suggestions(&terms)
        })
        .await
        .context("History task panicked")?;

        Ok(self.cards(candidates).await)
    }

    /// Cards for arbitrary titles (e.g. past searches), in the given order
    pub async fn cards_for_titles(&self, titles: &[String]) -> Vec<MovieCard> {
        let posters = self.posters.resolve_many(titles).await;
        titles
            .iter()
            .zip(posters)
            .map(|(title, poster_url)| MovieCard {
                title: title.clone(),
                poster_url,
            })
            .collect()
    }

    /// Sorted, distinct genre names
    pub fn genres(&self) -> Vec<String> {
        self.catalog.genres().to_vec()
    }

    async fn page_of(&self, candidates: Vec<Candidate>, page: usize) -> RecommendationPage {
        let window = PageWindow::new(candidates.len(), page, self.settings.page_size);
        let shown: Vec<Candidate> = candidates
            .into_iter()
            .skip(window.offset)
            .take(self.settings.page_size)
            .collect();

        RecommendationPage {
            movies: self.cards(shown).await,
            page: window.page,
            total_pages: window.total_pages,
            total_results: window.total,
            not_found: false,
            suggestions: Vec::new(),
        }
    }

    async fn cards(&self, candidates: Vec<Candidate>) -> Vec<MovieCard> {
        let titles: Vec<String> = candidates.into_iter().map(|c| c.title).collect();
        self.cards_for_titles(&titles).await
    }
}

/// Position of a 1-based page within `total` results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageWindow {
    page: usize,
    offset: usize,
    total: usize,
    total_pages: usize,
}

impl PageWindow {
    fn new(total: usize, page: usize, page_size: usize) -> Self {
        let page = page.max(1);
        Self {
            page,
            offset: (page - 1).saturating_mul(page_size),
            total,
            total_pages: total.div_ceil(page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window() {
        assert_eq!(
            PageWindow::new(30, 1, 12),
            PageWindow { page: 1, offset: 0, total: 30, total_pages: 3 }
        );
        assert_eq!(PageWindow::new(30, 3, 12).offset, 24);
        assert_eq!(PageWindow::new(24, 2, 12).total_pages, 2);
        assert_eq!(PageWindow::new(0, 1, 12).total_pages, 0);
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let window = PageWindow::new(5, 0, 12);
        assert_eq!(window.page, 1);
        assert_eq!(window.offset, 0);
    }
}
