//! History Source - suggestions from a user's past searches
//!
//! ## Algorithm
//! 1. Walk the search terms in the order given (newest first by convention)
//! 2. Terms that are not exact catalog titles contribute nothing
//! 3. Each matching term contributes its top `per_term` neighbours
//! 4. Titles already suggested (or searched for) are skipped, so the output
//!    holds each title at most once, first occurrence wins

use crate::similar::SimilaritySource;
use crate::types::{Candidate, CandidateSource};
use data_loader::Catalog;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Builds "because you searched for..." suggestions
#[derive(Clone)]
pub struct HistorySource {
    similar: SimilaritySource,
    /// Neighbours taken per search term
    per_term: usize,
}

impl HistorySource {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            similar: SimilaritySource::new(catalog),
            per_term: 9,
        }
    }

    /// Configure neighbours taken per term (default: 9)
    pub fn with_per_term(mut self, per_term: usize) -> Self {
        self.per_term = per_term;
        self
    }

    #[instrument(skip(self, terms), fields(terms = terms.len()))]
    pub fn suggestions<S: AsRef<str>>(&self, terms: &[S]) -> Vec<Candidate> {
        let searched: HashSet<&str> = terms.iter().map(|t| t.as_ref()).collect();
        let mut seen: HashSet<String> = HashSet::new();
        let mut suggestions = Vec::new();

        for term in terms {
            for mut candidate in self.similar.recommend(term.as_ref(), self.per_term) {
                if searched.contains(candidate.title.as_str()) {
                    continue;
                }
                if seen.insert(candidate.title.clone()) {
                    candidate.source = CandidateSource::History;
                    suggestions.push(candidate);
                }
            }
        }

        debug!("History produced {} suggestions", suggestions.len());
        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::catalog_from;

    fn titles(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.title.as_str()).collect()
    }

    fn catalog() -> Arc<Catalog> {
        catalog_from(
            &["Inception", "Interstellar", "Memento", "Titanic"],
            vec![
                vec![1.0, 0.9, 0.8, 0.1],
                vec![0.9, 1.0, 0.5, 0.2],
                vec![0.8, 0.5, 1.0, 0.0],
                vec![0.1, 0.2, 0.0, 1.0],
            ],
        )
    }

    #[test]
    fn test_suggestions_are_deduplicated() {
        let source = HistorySource::new(catalog()).with_per_term(2);

        let suggestions = source.suggestions(&["Titanic", "Memento"]);
        // Titanic -> Interstellar, Inception; Memento -> Inception (dup), Interstellar (dup)
        assert_eq!(titles(&suggestions), vec!["Interstellar", "Inception"]);
        assert!(suggestions.iter().all(|c| c.source == CandidateSource::History));
    }

    #[test]
    fn test_searched_titles_are_not_suggested() {
        let source = HistorySource::new(catalog());

        let suggestions = source.suggestions(&["Inception", "Interstellar"]);
        let got = titles(&suggestions);
        assert!(!got.contains(&"Inception"));
        assert!(!got.contains(&"Interstellar"));
        assert_eq!(got, vec!["Memento", "Titanic"]);
    }

    #[test]
    fn test_unknown_terms_contribute_nothing() {
        let source = HistorySource::new(catalog());

        assert!(source.suggestions(&["nope", "inception"]).is_empty());
        assert!(source.suggestions::<&str>(&[]).is_empty());
    }
}
