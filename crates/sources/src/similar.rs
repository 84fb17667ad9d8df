//! Similarity Source - nearest neighbours from the precomputed matrix
//!
//! Given a query title, returns the most similar other movies.
//!
//! ## Algorithm
//! 1. Resolve the title to its row (exact, case-sensitive)
//! 2. Read that row of the similarity matrix
//! 3. Stable-sort all rows by score, descending (ties keep row order)
//! 4. Skip the query row itself and keep the first `limit`

use crate::types::{Candidate, CandidateSource};
use data_loader::{Catalog, RowIndex};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Looks up neighbours of a title in the catalog's similarity matrix
#[derive(Clone)]
pub struct SimilaritySource {
    /// Shared read-only catalog, so no lock is needed
    catalog: Arc<Catalog>,
}

impl SimilaritySource {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Recommend up to `limit` titles similar to `title`.
    ///
    /// Returns an empty list when the title is not in the catalog; the caller
    /// decides whether to fall back to fuzzy suggestions.
    #[instrument(skip(self))]
    pub fn recommend(&self, title: &str, limit: usize) -> Vec<Candidate> {
        match self.catalog.find_row(title) {
            Some(row) => self.recommend_row(row, limit),
            None => {
                debug!("No exact match for '{}'", title);
                Vec::new()
            }
        }
    }

    /// Recommend neighbours of a known row
    pub fn recommend_row(&self, row: RowIndex, limit: usize) -> Vec<Candidate> {
        let Some(scores) = self.catalog.similarity_row(row) else {
            return Vec::new();
        };

        let candidates: Vec<Candidate> = rank_descending(scores)
            .into_iter()
            .filter(|&(other, _)| other != row)
            .take(limit)
            .filter_map(|(other, score)| {
                let movie = self.catalog.get(other)?;
                Some(Candidate::new(
                    other,
                    movie.title.clone(),
                    CandidateSource::Similarity,
                    score,
                ))
            })
            .collect();

        debug!("Found {} neighbours for row {}", candidates.len(), row);
        candidates
    }
}

/// Rows ordered by score, highest first; equal scores stay in row order
fn rank_descending(scores: &[f32]) -> Vec<(RowIndex, f32)> {
    let mut ranked: Vec<(RowIndex, f32)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::catalog_from;

    fn titles(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_recommend_top_one() {
        let catalog = catalog_from(
            &["Inception", "Interstellar", "Titanic"],
            vec![
                vec![1.0, 0.8, 0.1],
                vec![0.8, 1.0, 0.1],
                vec![0.1, 0.1, 1.0],
            ],
        );
        let source = SimilaritySource::new(catalog);

        let recs = source.recommend("Inception", 1);
        assert_eq!(titles(&recs), vec!["Interstellar"]);
        assert_eq!(recs[0].score, 0.8);
        assert_eq!(recs[0].source, CandidateSource::Similarity);
    }

    #[test]
    fn test_rank_descending_is_stable() {
        let ranked = rank_descending(&[0.2, 0.9, 0.2, 1.0]);
        let rows: Vec<RowIndex> = ranked.iter().map(|&(row, _)| row).collect();
        assert_eq!(rows, vec![3, 1, 0, 2]);
    }

    #[test]
    fn test_rank_descending_tolerates_nan() {
        let ranked = rank_descending(&[0.5, f32::NAN, 1.0, 0.1, f32::NAN]);
        assert_eq!(ranked.len(), 5);

        // Finite scores keep their relative order
        let finite: Vec<RowIndex> = ranked
            .iter()
            .filter(|(_, score)| score.is_finite())
            .map(|&(row, _)| row)
            .collect();
        assert_eq!(finite, vec![2, 0, 3]);
    }

    #[test]
    fn test_never_includes_query() {
        // Another row ties with the diagonal; the query must still be skipped
        let catalog = catalog_from(
            &["A", "B", "C"],
            vec![
                vec![1.0, 1.0, 0.5],
                vec![1.0, 1.0, 0.5],
                vec![0.5, 0.5, 1.0],
            ],
        );
        let source = SimilaritySource::new(catalog);

        for title in ["A", "B", "C"] {
            let recs = source.recommend(title, 10);
            assert_eq!(recs.len(), 2);
            assert!(recs.iter().all(|c| c.title != title));
        }
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let catalog = catalog_from(
            &["Q", "B", "C", "D", "E"],
            vec![
                vec![1.0, 0.3, 0.7, 0.3, 0.9],
                vec![0.3, 1.0, 0.0, 0.0, 0.0],
                vec![0.7, 0.0, 1.0, 0.0, 0.0],
                vec![0.3, 0.0, 0.0, 1.0, 0.0],
                vec![0.9, 0.0, 0.0, 0.0, 1.0],
            ],
        );
        let source = SimilaritySource::new(catalog);

        let recs = source.recommend("Q", 10);
        assert_eq!(titles(&recs), vec!["E", "C", "B", "D"]);
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_limit_larger_than_catalog() {
        let catalog = catalog_from(&["A", "B"], vec![vec![1.0, 0.2], vec![0.2, 1.0]]);
        let source = SimilaritySource::new(catalog);

        assert_eq!(source.recommend("A", 30).len(), 1);
    }

    #[test]
    fn test_unknown_title_is_empty() {
        let catalog = catalog_from(&["A", "B"], vec![vec![1.0, 0.2], vec![0.2, 1.0]]);
        let source = SimilaritySource::new(catalog);

        assert!(source.recommend("a", 5).is_empty());
        assert!(source.recommend("Missing", 5).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let catalog = catalog_from(
            &["A", "B", "C", "D"],
            vec![
                vec![1.0, 0.4, 0.4, 0.4],
                vec![0.4, 1.0, 0.1, 0.2],
                vec![0.4, 0.1, 1.0, 0.3],
                vec![0.4, 0.2, 0.3, 1.0],
            ],
        );
        let source = SimilaritySource::new(catalog);

        let first = source.recommend("A", 3);
        for _ in 0..10 {
            assert_eq!(source.recommend("A", 3), first);
        }
        assert_eq!(titles(&first), vec!["B", "C", "D"]);
    }
}
