//! Catalog Source - every movie, in row order
//!
//! Browsing features (by genre, by mood, by age group, by first letter) do
//! not start from a query title; they scan the whole catalog and let the
//! filter pipeline narrow it down.

use crate::types::{Candidate, CandidateSource};
use data_loader::Catalog;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct CatalogSource {
    catalog: Arc<Catalog>,
}

impl CatalogSource {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// All records as zero-score candidates
    #[instrument(skip(self))]
    pub fn all_candidates(&self) -> Vec<Candidate> {
        let candidates: Vec<Candidate> = self
            .catalog
            .movies()
            .iter()
            .enumerate()
            .map(|(row, movie)| Candidate::new(row, movie.title.clone(), CandidateSource::Catalog, 0.0))
            .collect();

        debug!("Catalog source yielded {} candidates", candidates.len());
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog_from, identity};

    #[test]
    fn test_all_candidates_in_row_order() {
        let source = CatalogSource::new(catalog_from(&["Up", "Saw", "Up"], identity(3)));

        let candidates = source.all_candidates();
        let rows: Vec<usize> = candidates.iter().map(|c| c.row).collect();
        assert_eq!(rows, vec![0, 1, 2]);
        assert!(candidates.iter().all(|c| c.score == 0.0));
        assert!(candidates.iter().all(|c| c.source == CandidateSource::Catalog));
    }

    #[test]
    fn test_empty_catalog() {
        let source = CatalogSource::new(catalog_from(&[], vec![]));
        assert!(source.all_candidates().is_empty());
    }
}
