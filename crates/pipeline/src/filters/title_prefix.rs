//! Filter for browsing titles by their first letter(s).

use crate::traits::Filter;
use anyhow::Result;
use data_loader::Catalog;
use sources::Candidate;

/// Keeps candidates whose title starts with a prefix, ignoring case
pub struct TitlePrefixFilter {
    prefix: String,
}

impl TitlePrefixFilter {
    pub fn new(prefix: impl AsRef<str>) -> Self {
        Self {
            prefix: prefix.as_ref().to_lowercase(),
        }
    }
}

impl Filter for TitlePrefixFilter {
    fn name(&self) -> &str {
        "TitlePrefixFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, _catalog: &Catalog) -> Result<Vec<Candidate>> {
        Ok(candidates
            .into_iter()
            .filter(|c| c.title.to_lowercase().starts_with(&self.prefix))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::small_catalog;
    use sources::CatalogSource;
    use std::sync::Arc;

    #[test]
    fn test_prefix_ignores_case() {
        let catalog = Arc::new(small_catalog());
        let candidates = CatalogSource::new(catalog.clone()).all_candidates();

        let filtered = TitlePrefixFilter::new("U").apply(candidates, &catalog).unwrap();
        let titles: Vec<&str> = filtered.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Up", "Uncut Gems"]);
    }

    #[test]
    fn test_no_match() {
        let catalog = Arc::new(small_catalog());
        let candidates = CatalogSource::new(catalog.clone()).all_candidates();

        assert!(TitlePrefixFilter::new("z").apply(candidates, &catalog).unwrap().is_empty());
    }
}
