//! Offline evaluation by tag overlap.
//!
//! There are no user ratings to evaluate against, so relevance is
//! approximated from content: a recommendation counts as relevant when it
//! shares at least `min_overlap` distinct tag tokens with the query movie.
//!
//! Every recommended item is treated as a predicted positive, so per-sample
//! recall is 1 and the interesting number is precision. Samples with no
//! relevant recommendation at all are skipped.

use crate::similar::SimilaritySource;
use data_loader::Catalog;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Averages over the evaluated samples
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EvaluationReport {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Samples that contributed to the averages
    pub evaluated: usize,
}

pub struct TagOverlapEvaluator {
    catalog: Arc<Catalog>,
    similar: SimilaritySource,
    top_k: usize,
    max_samples: usize,
    min_overlap: usize,
    seed: u64,
}

impl TagOverlapEvaluator {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            similar: SimilaritySource::new(catalog.clone()),
            catalog,
            top_k: 10,
            max_samples: 100,
            min_overlap: 5,
            seed: 42,
        }
    }

    /// Recommendations inspected per sample (default: 10)
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Upper bound on sampled query movies (default: 100)
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Shared tag tokens needed for relevance (default: 5)
    pub fn with_min_overlap(mut self, min_overlap: usize) -> Self {
        self.min_overlap = min_overlap;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[instrument(skip(self), fields(top_k = self.top_k, samples = self.max_samples))]
    pub fn evaluate(&self) -> EvaluationReport {
        let total = self.catalog.len();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let rows = sample(&mut rng, total, self.max_samples.min(total)).into_vec();

        let mut precision_sum = 0.0;
        let mut recall_sum = 0.0;
        let mut f1_sum = 0.0;
        let mut evaluated = 0;

        for row in rows {
            let Some(query) = self.catalog.get(row) else {
                continue;
            };
            let recommendations = self.similar.recommend_row(row, self.top_k);
            if recommendations.is_empty() {
                continue;
            }

            let query_tags = query.tag_set();
            let relevant = recommendations
                .iter()
                .filter_map(|c| self.catalog.get(c.row))
                .filter(|movie| movie.tag_set().intersection(&query_tags).count() >= self.min_overlap)
                .count();
            if relevant == 0 {
                debug!("No relevant recommendation for '{}'", query.title);
                continue;
            }

            let precision = relevant as f64 / recommendations.len() as f64;
            let recall = 1.0;
            precision_sum += precision;
            recall_sum += recall;
            f1_sum += 2.0 * precision * recall / (precision + recall);
            evaluated += 1;
        }

        if evaluated == 0 {
            info!("No sample had a relevant recommendation");
            return EvaluationReport::default();
        }

        let n = evaluated as f64;
        let report = EvaluationReport {
            precision: precision_sum / n,
            recall: recall_sum / n,
            f1: f1_sum / n,
            evaluated,
        };
        info!(
            "Evaluated {} samples: precision {:.4}, recall {:.4}, f1 {:.4}",
            report.evaluated, report.precision, report.recall, report.f1
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::catalog_with;
    use data_loader::MovieRecord;

    fn record(id: u32, title: &str, tags: &str) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            tags: tags.to_string(),
            genres: vec![],
        }
    }

    fn catalog() -> Arc<Catalog> {
        catalog_with(
            vec![
                record(1, "A", "space ship crew alien planet"),
                record(2, "B", "space ship crew alien planet war"),
                record(3, "C", "love boat sea ice"),
            ],
            vec![
                vec![1.0, 0.9, 0.1],
                vec![0.9, 1.0, 0.1],
                vec![0.1, 0.1, 1.0],
            ],
        )
    }

    #[test]
    fn test_precision_from_tag_overlap() {
        let report = TagOverlapEvaluator::new(catalog())
            .with_top_k(2)
            .with_min_overlap(5)
            .evaluate();

        // A and B each find one relevant item out of two; C finds none and is skipped
        assert_eq!(report.evaluated, 2);
        assert!((report.precision - 0.5).abs() < 1e-9);
        assert_eq!(report.recall, 1.0);
        assert!((report.f1 - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_nothing_relevant_gives_empty_report() {
        let report = TagOverlapEvaluator::new(catalog())
            .with_min_overlap(50)
            .evaluate();
        assert_eq!(report, EvaluationReport::default());
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let evaluator = TagOverlapEvaluator::new(catalog())
            .with_top_k(1)
            .with_max_samples(2)
            .with_min_overlap(1)
            .with_seed(7);

        assert_eq!(evaluator.evaluate(), evaluator.evaluate());
        assert!(evaluator.evaluate().evaluated <= 2);
    }
}
