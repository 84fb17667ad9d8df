//! Filter to keep only movies in any of a set of genres.
//!
//! Used for browsing by genre, and by mood or age group once the category
//! label has been mapped to genres.

use crate::text::strip_spaces;
use crate::traits::Filter;
use anyhow::Result;
use data_loader::Catalog;
use sources::Candidate;
use std::collections::HashSet;

/// Keeps candidates having at least one of the wanted genres.
///
/// Genres compare case-insensitively with whitespace removed, so
/// "science fiction" matches the stored "ScienceFiction". An empty genre
/// set keeps nothing.
pub struct GenreFilter {
    wanted: HashSet<String>,
}

fn genre_key(genre: &str) -> String {
    strip_spaces(genre).to_lowercase()
}

impl GenreFilter {
    pub fn new<I, S>(genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            wanted: genres.into_iter().map(|g| genre_key(g.as_ref())).collect(),
        }
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, catalog: &Catalog) -> Result<Vec<Candidate>> {
        let filtered = candidates
            .into_iter()
            .filter(|candidate| match catalog.get(candidate.row) {
                Some(movie) => movie
                    .genres
                    .iter()
                    .any(|genre| self.wanted.contains(&genre_key(genre))),
                None => false, // Exclude rows outside the catalog
            })
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::small_catalog;
    use sources::{CandidateSource, CatalogSource};
    use std::sync::Arc;

    fn titles(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_kids_genres() {
        let catalog = Arc::new(small_catalog());
        let candidates = CatalogSource::new(catalog.clone()).all_candidates();

        let filtered = GenreFilter::new(["Animation", "Family"])
            .apply(candidates, &catalog)
            .unwrap();
        assert_eq!(titles(&filtered), vec!["Up", "Toy Story"]);
    }

    #[test]
    fn test_case_and_space_insensitive() {
        let catalog = Arc::new(small_catalog());
        let candidates = CatalogSource::new(catalog.clone()).all_candidates();

        let filtered = GenreFilter::new(["  hor ror"]).apply(candidates, &catalog).unwrap();
        assert_eq!(titles(&filtered), vec!["Saw"]);
    }

    #[test]
    fn test_empty_genre_set_keeps_nothing() {
        let catalog = Arc::new(small_catalog());
        let candidates = CatalogSource::new(catalog.clone()).all_candidates();

        let filtered = GenreFilter::new(Vec::<String>::new())
            .apply(candidates, &catalog)
            .unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_unknown_rows_are_dropped() {
        let catalog = small_catalog();
        let stray = vec![Candidate::new(99, "Ghost", CandidateSource::Catalog, 0.0)];

        let filtered = GenreFilter::new(["Horror"]).apply(stray, &catalog).unwrap();
        assert!(filtered.is_empty());
    }
}
